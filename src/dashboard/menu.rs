use serde::Serialize;

/// One plate component of the recommended menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Portion {
    pub icon: &'static str,
    pub name: &'static str,
    pub grams: u32,
}

/// Ideal portion per meal.
pub const IDEAL_MENU: [Portion; 3] = [
    Portion { icon: "🍚", name: "Rice", grams: 150 },
    Portion { icon: "🥕", name: "Vegetables", grams: 80 },
    Portion { icon: "🍗", name: "Side dish: chicken", grams: 70 },
];

pub fn recommended_menu() -> &'static [Portion] {
    &IDEAL_MENU
}
