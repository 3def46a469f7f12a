//! Clothing type inference from free-text product names.

use crate::taxonomy::ClothingType;

/// Keyword table, Spanish and English synonyms. Iteration order is the
/// tie-break: the first type with a matching keyword wins.
const TYPE_KEYWORDS: &[(ClothingType, &[&str])] = &[
    (ClothingType::Shirt, &["camisa", "camiseta", "blusa"]),
    (ClothingType::Vest, &["chaleco"]),
    (ClothingType::Top, &["top", "crop"]),
    (ClothingType::Sweater, &["jersey", "sweater"]),
    (
        ClothingType::Jacket,
        &["chaqueta", "jacket", "americana", "blazer"],
    ),
    (ClothingType::TrenchCoat, &["gabardina", "trench"]),
    (ClothingType::Jean, &["jean", "vaquero"]),
    (ClothingType::Pant, &["pantalon", "trouser"]),
    (ClothingType::Skirt, &["falda", "skirt"]),
    (ClothingType::Short, &["short", "bermuda"]),
    (ClothingType::Set, &["set", "conjunto", "outfit"]),
    (ClothingType::Overall, &["mono", "overall", "peto"]),
    (ClothingType::Dress, &["vestido", "dress"]),
    (ClothingType::Bodysuit, &["body", "malla"]),
];

/// Infers a clothing type from a product name by keyword substring match.
///
/// The name is lowercased and stripped of Spanish accents before matching, so
/// `"Pantalón"` matches the `pantalon` keyword. Returns `None` when the name is
/// empty or no keyword matches.
#[must_use]
pub fn infer_type(name: &str) -> Option<ClothingType> {
    if name.trim().is_empty() {
        return None;
    }

    let normalized = fold_accents(&name.to_lowercase());

    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| normalized.contains(kw)))
        .map(|(clothing_type, _)| *clothing_type)
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}
