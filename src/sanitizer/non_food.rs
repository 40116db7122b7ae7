//! Keyword heuristic for detected "foods" that are obviously scenery.

/// Whole-name placeholders models emit when they see nothing useful
const PLACEHOLDER_NAMES: &[&str] = &[
    "unknown",
    "unknown food",
    "unidentified",
    "n a",
    "na",
    "none",
    "nothing",
    "no food",
    "not food",
    "not a food",
    "desconhecido",
    "nenhum",
];

/// Tableware and background objects
const NON_FOOD_NOUNS: &[&str] = &[
    "plate", "plates", "table", "bowl", "bowls", "dish", "fork", "knife", "spoon",
    "chopsticks", "napkin", "napkins", "tray", "placemat", "tablecloth", "cutlery",
    "utensil", "utensils", "background", "container", "packaging", "wrapper",
    "unknown", "prato", "mesa", "garfo", "faca", "colher", "guardanapo", "bandeja",
];

/// Words that do not turn a non-food noun into food
const NEUTRAL_MODIFIERS: &[&str] = &[
    "a", "an", "the", "of", "and", "empty", "clean", "dirty", "wooden", "white",
    "black", "glass", "ceramic", "metal", "plastic", "paper", "dinner", "serving",
    "item", "object", "vazio", "vazia", "de",
];

/// True when the name is clearly not a food. Callers drop such entries
/// silently; this never fails.
pub fn is_clearly_non_food_name(name: &str) -> bool {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    if words.is_empty() {
        return true;
    }

    if PLACEHOLDER_NAMES.contains(&words.join(" ").as_str()) {
        return true;
    }

    let mut saw_noun = false;
    for word in &words {
        if NON_FOOD_NOUNS.contains(word) {
            saw_noun = true;
        } else if !NEUTRAL_MODIFIERS.contains(word) {
            return false;
        }
    }
    saw_noun
}
