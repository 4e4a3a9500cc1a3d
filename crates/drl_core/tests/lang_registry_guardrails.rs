use std::collections::HashMap;

use drl_core::lang::attributes;
use drl_core::lang::brackets::{self, BracketKind};
use drl_core::lang::keywords;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn attribute_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, attributes::AttributeId> = HashMap::new();

    for info in attributes::ATTRIBUTES {
        assert_eq!(attributes::from_str(info.canonical), Some(info.id));
        assert_eq!(attributes::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate attribute spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn attributes_never_shadow_keywords() {
    for info in attributes::ATTRIBUTES {
        assert_eq!(
            keywords::from_str(info.canonical),
            None,
            "attribute {:?} collides with a keyword",
            info.canonical
        );
    }
}

#[test]
fn bracket_classification_round_trips() {
    for kind in BracketKind::ALL {
        assert_eq!(brackets::classify(kind.open()), Some((kind, true)));
        assert_eq!(brackets::classify(kind.close()), Some((kind, false)));
        assert_eq!(BracketKind::ALL[kind.index()], kind);
    }
}
