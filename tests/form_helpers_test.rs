// 表单校验与导航抽屉的公开接口测试
use recipe_uploads::nav::{ClassChange, NavDrawer};
use recipe_uploads::validators::{has, min_length, valid_amount};

#[test]
fn test_ingredient_row_validation() {
    let rows = [
        ("flour", "2.5", true),
        ("sugar", "1/3", true),
        ("", "1", false),
        ("salt", "pinch", false),
    ];

    for (name, amount, expected) in rows {
        assert_eq!(has(name) && valid_amount(amount), expected, "{name:?} {amount:?}");
    }
}

#[test]
fn test_password_min_length() {
    assert!(min_length("hunter22", 8));
    assert!(!min_length("short", 8));
}

#[test]
fn test_drawer_clicks_alternate() {
    let mut drawer = NavDrawer::new();
    let changes: Vec<ClassChange> = (0..4).map(|_| drawer.toggle()).collect();

    assert_eq!(changes[0], changes[2]);
    assert_eq!(changes[1], changes[3]);
    assert_eq!(changes[0].add, changes[1].remove);
    assert!(!drawer.is_open());
}
