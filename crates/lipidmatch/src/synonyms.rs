use std::collections::BTreeMap;

// -------------------------------------------------------------------------------------------------
// ClassSynonyms
// -------------------------------------------------------------------------------------------------
/// Class-name synonym substitution rules for matching.
///
/// Reference databases disagree on class naming for some lipid families; the
/// canonical example is the hexosylceramides, where one side names the generic
/// class `HexCer` and the other the specific sugars `GlcCer`/`GalCer`. A rule
/// maps a class name to the synonym class names to additionally try.
///
/// The value is explicit, immutable configuration: callers merge their own
/// rules over the builtin table with [`ClassSynonyms::with_overrides`], where a
/// caller-supplied key replaces the builtin entry wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSynonyms {
    table: BTreeMap<String, Vec<String>>,
}

impl ClassSynonyms {
    /// The builtin substitution rules.
    pub fn builtin() -> Self {
        let table = BTreeMap::from([(
            "HexCer".to_owned(),
            vec!["GlcCer".to_owned(), "GalCer".to_owned()],
        )]);
        ClassSynonyms { table }
    }

    /// The builtin rules with caller-supplied rules merged over them.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut synonyms = Self::builtin();
        synonyms.table.extend(overrides);
        synonyms
    }

    /// Iterate over `(class name, synonym names)` rules in class-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.table.iter().map(|(class, syns)| (class.as_str(), syns.as_slice()))
    }

    /// How many substitution rules are configured?
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Are any substitution rules configured?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for ClassSynonyms {
    fn default() -> Self {
        Self::builtin()
    }
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_covers_hexosylceramides() {
        let synonyms = ClassSynonyms::builtin();
        let rules: Vec<(&str, &[String])> = synonyms.iter().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].0, "HexCer");
        assert_eq!(rules[0].1, &["GlcCer".to_owned(), "GalCer".to_owned()]);
    }

    #[test]
    fn overrides_win_on_key_collision() {
        let synonyms = ClassSynonyms::with_overrides([
            ("HexCer".to_owned(), vec!["GalCer".to_owned()]),
            ("TG".to_owned(), vec!["TAG".to_owned()]),
        ]);
        assert_eq!(synonyms.len(), 2);
        let rules: BTreeMap<&str, &[String]> = synonyms.iter().collect();
        assert_eq!(rules["HexCer"], &["GalCer".to_owned()]);
        assert_eq!(rules["TG"], &["TAG".to_owned()]);
    }
}
