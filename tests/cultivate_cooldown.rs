use chrono::{Duration, Utc};
use peiyangmin::dish::{DishCommand, DishProcessor, DishStoreBuilder, ItemEntry, PetriDish};

fn test_processor(dir: &tempfile::TempDir) -> DishProcessor {
    let store = DishStoreBuilder::new(dir.path()).open().expect("store");
    DishProcessor::new(store)
}

#[test]
fn cultivate_doubles_every_quantity_and_stamps_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let processor = test_processor(&dir);

    let mut dish = PetriDish::new("alice");
    dish.items = vec![ItemEntry::new("a", "3"), ItemEntry::new("b", "10")];
    processor.store().create_dish(dish).expect("create");

    let t0 = Utc::now();
    let reply = processor
        .handle_at("alice", DishCommand::Cultivate, t0)
        .expect("cultivate");
    assert_eq!(reply, "🌱 培养成功！\n· a × 6\n· b × 20");

    let dish = processor
        .store()
        .get_dish("alice")
        .expect("get")
        .expect("present");
    assert_eq!(
        dish.items,
        vec![ItemEntry::new("a", "6"), ItemEntry::new("b", "20")]
    );
    assert_eq!(dish.last_double_time, Some(t0));
}

#[test]
fn second_cultivate_inside_cooldown_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let processor = test_processor(&dir);

    let mut dish = PetriDish::new("bob");
    dish.items = vec![ItemEntry::new("菌落", "4")];
    processor.store().create_dish(dish).expect("create");

    let t0 = Utc::now();
    processor
        .handle_at("bob", DishCommand::Cultivate, t0)
        .expect("first cultivate");

    // Two minutes in, three minutes remain.
    let reply = processor
        .handle_at("bob", DishCommand::Cultivate, t0 + Duration::minutes(2))
        .expect("second cultivate");
    assert_eq!(reply, "培养冷却中，请 3 分钟后再试。");
    let dish = processor
        .store()
        .get_dish("bob")
        .expect("get")
        .expect("present");
    assert_eq!(dish.items, vec![ItemEntry::new("菌落", "8")]);
    assert_eq!(dish.last_double_time, Some(t0));

    // Remaining time is reported in whole minutes, rounded up.
    let reply = processor
        .handle_at(
            "bob",
            DishCommand::Cultivate,
            t0 + Duration::seconds(4 * 60 + 30),
        )
        .expect("cultivate");
    assert_eq!(reply, "培养冷却中，请 1 分钟后再试。");
}

#[test]
fn cultivate_allowed_again_once_cooldown_elapses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let processor = test_processor(&dir);

    let mut dish = PetriDish::new("carol");
    dish.items = vec![ItemEntry::new("菌落", "4")];
    processor.store().create_dish(dish).expect("create");

    let t0 = Utc::now();
    processor
        .handle_at("carol", DishCommand::Cultivate, t0)
        .expect("first cultivate");
    let reply = processor
        .handle_at("carol", DishCommand::Cultivate, t0 + Duration::minutes(5))
        .expect("second cultivate");
    assert_eq!(reply, "🌱 培养成功！\n· 菌落 × 16");
}

#[test]
fn cultivate_on_empty_or_missing_dish_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let processor = test_processor(&dir);

    let reply = processor
        .handle("dave", DishCommand::Cultivate)
        .expect("cultivate");
    assert_eq!(reply, "培养皿为空，无法培养。");

    processor
        .store()
        .create_dish(PetriDish::new("dave"))
        .expect("create");
    let reply = processor
        .handle("dave", DishCommand::Cultivate)
        .expect("cultivate");
    assert_eq!(reply, "培养皿为空，无法培养。");
}

#[test]
fn doubling_stays_exact_at_large_magnitudes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let processor = test_processor(&dir);

    // Past u128 range already.
    let mut dish = PetriDish::new("erin");
    dish.items = vec![ItemEntry::new(
        "菌海",
        "340282366920938463463374607431768211456",
    )];
    processor.store().create_dish(dish).expect("create");

    let reply = processor
        .handle("erin", DishCommand::Cultivate)
        .expect("cultivate");
    assert!(reply.contains("· 菌海 × 680564733841876926926749214863536422912"));
}
