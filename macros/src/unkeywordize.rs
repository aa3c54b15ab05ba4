use std::borrow::Cow;
use syn::Ident;

/// Prefixes `ident` with an underscore when it is not usable as a plain
/// identifier, which is the case for strict and reserved keywords.
pub fn unkeywordize(mut ident: Cow<'_, str>) -> Cow<'_, str> {
    if syn::parse_str::<Ident>(&ident).is_err() {
        ident.to_mut().insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(unkeywordize("type".into()), "_type");
        assert_eq!(unkeywordize("match".into()), "_match");
        assert_eq!(unkeywordize("async".into()), "_async");
        assert_eq!(unkeywordize("self".into()), "_self");
        assert_eq!(unkeywordize("abstract".into()), "_abstract");
    }

    #[test]
    fn plain_words() {
        assert_eq!(unkeywordize("ctrl".into()), "ctrl");
        assert_eq!(unkeywordize("types".into()), "types");
        assert_eq!(unkeywordize("in_range".into()), "in_range");
        assert_eq!(unkeywordize("union".into()), "union");
    }
}
