//! Dish command parsing and handling.
//!
//! Every invocation is one read of the caller's dish record, a branch on the
//! subcommand, at most one store write, and a formatted text reply. All
//! user-facing rejections (missing argument, cooldown, rename conflicts) are
//! reply text, never `Err` values; only storage failures surface as errors.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::dish::errors::DishError;
use crate::dish::quantity;
use crate::dish::storage::DishStore;
use crate::dish::types::{DishPatch, ItemEntry, PetriDish};
use crate::logutil::escape_log;

/// Minimum interval between successive cultivates, shared by the status
/// display and the cultivate gate.
pub const CULTIVATE_COOLDOWN_MS: i64 = 5 * 60 * 1000;

const HELP_TEXT: &str = "【培养皿使用说明】
/培养皿 放入 <物品>      → 申请清空并放入新物品（需二次确认）
/培养皿 确认放入 <物品>  → 正式清空并放入新物品
/培养皿 状态            → 查看当前物品列表（高精度支持）
/培养皿 培养            → 5 分钟 CD，所有物品数量翻倍
/培养皿 重命名 <原名> <新名> → 改名
/培养皿 help            → 再次显示本帮助";

/// Parsed dish subcommands. Arguments stay optional here; the handler owns
/// the missing-argument replies so the texts live in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DishCommand {
    Help,
    Insert(Option<String>),
    ConfirmInsert(Option<String>),
    Status,
    Cultivate,
    Rename(Option<String>, Option<String>),
    Unknown(String),
}

impl DishCommand {
    /// Map a subcommand token and up to two positional arguments onto a
    /// command. An absent or empty subcommand means help.
    pub fn parse(subcmd: Option<&str>, arg1: Option<&str>, arg2: Option<&str>) -> Self {
        let owned = |s: Option<&str>| s.map(str::to_string);
        match subcmd {
            None | Some("") | Some("help") => DishCommand::Help,
            Some("放入") => DishCommand::Insert(owned(arg1)),
            Some("确认放入") => DishCommand::ConfirmInsert(owned(arg1)),
            Some("状态") => DishCommand::Status,
            Some("培养") => DishCommand::Cultivate,
            Some("重命名") => DishCommand::Rename(owned(arg1), owned(arg2)),
            Some(other) => DishCommand::Unknown(other.to_string()),
        }
    }
}

/// Render an item list for replies: one `· name × quantity` line per entry,
/// in stored order.
pub fn fmt_list(items: &[ItemEntry]) -> String {
    if items.is_empty() {
        return "（空）".to_string();
    }
    items
        .iter()
        .map(|e| format!("· {} × {}", e.name, e.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cooldown_remaining_minutes(last: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
    let elapsed = now.signed_duration_since(last).num_milliseconds();
    if elapsed >= CULTIVATE_COOLDOWN_MS {
        return None;
    }
    let remain = CULTIVATE_COOLDOWN_MS - elapsed;
    // Whole minutes, rounded up.
    Some((remain + 60_000 - 1) / 60_000)
}

/// Command processor owning the dish store.
pub struct DishProcessor {
    store: DishStore,
}

impl DishProcessor {
    pub fn new(store: DishStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DishStore {
        &self.store
    }

    /// Handle one command for `user_id` and return the reply text.
    pub fn handle(&self, user_id: &str, command: DishCommand) -> Result<String, DishError> {
        self.handle_at(user_id, command, Utc::now())
    }

    /// Like [`handle`](Self::handle), but with an explicit clock so cooldown
    /// behavior is testable.
    pub fn handle_at(
        &self,
        user_id: &str,
        command: DishCommand,
        now: DateTime<Utc>,
    ) -> Result<String, DishError> {
        debug!(
            "dish command: user={} command={:?}",
            escape_log(user_id),
            command
        );
        let dish = self.store.get_dish(user_id)?;

        match command {
            DishCommand::Help => Ok(HELP_TEXT.to_string()),

            DishCommand::Insert(None) => Ok("请输入要放入的物品名称。".to_string()),
            DishCommand::Insert(Some(name)) => self.handle_insert(user_id, dish, name),

            DishCommand::ConfirmInsert(None) => Ok("请输入物品名称。".to_string()),
            DishCommand::ConfirmInsert(Some(name)) => {
                self.handle_confirm_insert(user_id, dish, name)
            }

            DishCommand::Status => Ok(Self::render_status(dish.as_ref(), now)),

            DishCommand::Cultivate => self.handle_cultivate(user_id, dish, now),

            DishCommand::Rename(old, new) => self.handle_rename(user_id, dish, old, new),

            DishCommand::Unknown(_) => {
                Ok("未知指令，请使用 /培养皿 help 查看帮助。".to_string())
            }
        }
    }

    /// Stage an insert. A missing dish is created on the spot with the item
    /// at quantity 1; an existing dish only gets `pending_item` set and keeps
    /// its contents until the confirming command arrives.
    fn handle_insert(
        &self,
        user_id: &str,
        dish: Option<PetriDish>,
        name: String,
    ) -> Result<String, DishError> {
        let Some(dish) = dish else {
            let mut created = PetriDish::new(user_id);
            created.items = vec![ItemEntry::new(name.clone(), "1")];
            self.store.create_dish(created)?;
            info!(
                "created dish: user={} item={}",
                escape_log(user_id),
                escape_log(&name)
            );
            return Ok(format!(
                "🎉 已为你创建培养皿并直接放入“{}”（原为空）。",
                name
            ));
        };
        self.store.set_dish(
            user_id,
            DishPatch {
                pending_item: Some(Some(name.clone())),
                ..Default::default()
            },
        )?;
        Ok(format!(
            "⚠️ 准备清空培养皿并放入“{}”。  \n当前内容：\n{}\n  \n如确认请输入：/培养皿 确认放入 {}",
            name,
            fmt_list(&dish.items),
            name
        ))
    }

    fn handle_confirm_insert(
        &self,
        user_id: &str,
        dish: Option<PetriDish>,
        name: String,
    ) -> Result<String, DishError> {
        let pending_matches = dish
            .as_ref()
            .and_then(|d| d.pending_item.as_deref())
            .is_some_and(|p| p == name);
        if !pending_matches {
            return Ok("没有待确认的放入请求，请先 /培养皿 放入 <物品>。".to_string());
        }
        self.store.set_dish(
            user_id,
            DishPatch {
                items: Some(vec![ItemEntry::new(name.clone(), "1")]),
                pending_item: Some(None),
                ..Default::default()
            },
        )?;
        Ok(format!("✅ 已清空并放入“{}”，数量：1", name))
    }

    fn render_status(dish: Option<&PetriDish>, now: DateTime<Utc>) -> String {
        let Some(dish) = dish else {
            return "培养皿为空，或未创建。".to_string();
        };
        if dish.items.is_empty() {
            let mut msg = "培养皿为空，或未创建。".to_string();
            if let Some(pending) = dish.pending_item.as_deref() {
                msg.push_str(&format!("\n待确认放入“{}”。", pending));
            }
            return msg;
        }
        let mut msg = format!("🧪 当前培养皿：\n{}", fmt_list(&dish.items));
        if let Some(left) = dish
            .last_double_time
            .and_then(|last| cooldown_remaining_minutes(last, now))
        {
            msg.push_str(&format!("\n⏳ 培养冷却中，还剩 {} 分钟", left));
        }
        if let Some(pending) = dish.pending_item.as_deref() {
            msg.push_str(&format!("\n⏸️ 待确认放入“{}”", pending));
        }
        msg
    }

    /// Double every quantity, gated by the cooldown. Doubling is an exact
    /// decimal multiply, so quantities keep growing losslessly forever.
    fn handle_cultivate(
        &self,
        user_id: &str,
        dish: Option<PetriDish>,
        now: DateTime<Utc>,
    ) -> Result<String, DishError> {
        let Some(dish) = dish.filter(|d| !d.items.is_empty()) else {
            return Ok("培养皿为空，无法培养。".to_string());
        };
        if let Some(remain) = dish
            .last_double_time
            .and_then(|last| cooldown_remaining_minutes(last, now))
        {
            return Ok(format!("培养冷却中，请 {} 分钟后再试。", remain));
        }
        let mut doubled = Vec::with_capacity(dish.items.len());
        for entry in &dish.items {
            doubled.push(ItemEntry::new(
                entry.name.clone(),
                quantity::double(&entry.quantity)?,
            ));
        }
        self.store.set_dish(
            user_id,
            DishPatch {
                items: Some(doubled.clone()),
                last_double_time: Some(now),
                ..Default::default()
            },
        )?;
        info!("cultivated dish: user={}", escape_log(user_id));
        Ok(format!("🌱 培养成功！\n{}", fmt_list(&doubled)))
    }

    /// Move a quantity to a new name. The renamed entry lands at the end of
    /// the display order; everything else keeps its position.
    fn handle_rename(
        &self,
        user_id: &str,
        dish: Option<PetriDish>,
        old: Option<String>,
        new: Option<String>,
    ) -> Result<String, DishError> {
        let (Some(old), Some(new)) = (old, new) else {
            return Ok("用法：/培养皿 重命名 <原名> <新名>".to_string());
        };
        let Some(dish) = dish else {
            return Ok(format!("没有找到“{}”。", old));
        };
        let Some(pos) = dish.items.iter().position(|e| e.name == old) else {
            return Ok(format!("没有找到“{}”。", old));
        };
        if dish.has_item(&new) {
            return Ok(format!("名称“{}”已存在。", new));
        }
        let mut items = dish.items;
        let moved = items.remove(pos);
        let qty = moved.quantity;
        items.push(ItemEntry::new(new.clone(), qty.clone()));
        self.store.set_dish(
            user_id,
            DishPatch {
                items: Some(items),
                ..Default::default()
            },
        )?;
        Ok(format!(
            "✏️ 已将“{}”重命名为“{}”，数量：{}",
            old, new, qty
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_subcommand_literals() {
        assert_eq!(DishCommand::parse(None, None, None), DishCommand::Help);
        assert_eq!(DishCommand::parse(Some(""), None, None), DishCommand::Help);
        assert_eq!(
            DishCommand::parse(Some("help"), None, None),
            DishCommand::Help
        );
        assert_eq!(
            DishCommand::parse(Some("放入"), Some("细菌"), None),
            DishCommand::Insert(Some("细菌".to_string()))
        );
        assert_eq!(
            DishCommand::parse(Some("确认放入"), None, None),
            DishCommand::ConfirmInsert(None)
        );
        assert_eq!(DishCommand::parse(Some("状态"), None, None), DishCommand::Status);
        assert_eq!(
            DishCommand::parse(Some("培养"), None, None),
            DishCommand::Cultivate
        );
        assert_eq!(
            DishCommand::parse(Some("重命名"), Some("a"), Some("b")),
            DishCommand::Rename(Some("a".to_string()), Some("b".to_string()))
        );
        assert_eq!(
            DishCommand::parse(Some("投喂"), None, None),
            DishCommand::Unknown("投喂".to_string())
        );
    }

    #[test]
    fn fmt_list_empty_and_entries() {
        assert_eq!(fmt_list(&[]), "（空）");
        let items = vec![ItemEntry::new("a", "3"), ItemEntry::new("b", "10")];
        assert_eq!(fmt_list(&items), "· a × 3\n· b × 10");
    }

    #[test]
    fn cooldown_minutes_round_up() {
        let last = Utc::now();
        // 30 seconds in: 4.5 minutes remain, reported as 5.
        let now = last + chrono::Duration::seconds(30);
        assert_eq!(cooldown_remaining_minutes(last, now), Some(5));
        // 4 minutes in: 1 minute remains.
        let now = last + chrono::Duration::minutes(4);
        assert_eq!(cooldown_remaining_minutes(last, now), Some(1));
        // Exactly elapsed.
        let now = last + chrono::Duration::minutes(5);
        assert_eq!(cooldown_remaining_minutes(last, now), None);
    }
}
