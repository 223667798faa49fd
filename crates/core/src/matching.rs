use crate::tag::Tag;

/// Whether `subject` contains everything `standard` describes.
///
/// A missing standard matches anything; a missing subject matches nothing.
/// Compounds match when every key of the standard matches the subject's
/// value under that key, extra subject keys being allowed. With
/// `ignore_list_order`, each standard list element needs some matching
/// element anywhere in the subject list. Everything else compares by
/// equality, so kinds must agree exactly.
pub fn matches(standard: Option<&Tag>, subject: Option<&Tag>, ignore_list_order: bool) -> bool {
    let Some(standard) = standard else {
        return true;
    };
    let Some(subject) = subject else {
        return false;
    };
    if standard.kind() != subject.kind() {
        return false;
    }
    match (standard, subject) {
        (Tag::Compound(standard), Tag::Compound(subject)) => {
            subject.len() >= standard.len()
                && standard
                    .iter()
                    .all(|(key, value)| matches(Some(value), subject.get(key), ignore_list_order))
        }
        (Tag::List(standard), Tag::List(subject)) if ignore_list_order => {
            if standard.is_empty() {
                return subject.is_empty();
            }
            subject.len() >= standard.len()
                && standard.iter().all(|wanted| {
                    subject
                        .iter()
                        .any(|candidate| matches(Some(wanted), Some(candidate), true))
                })
        }
        _ => standard == subject,
    }
}

#[cfg(test)]
#[path = "tests/matching_tests.rs"]
mod tests;
