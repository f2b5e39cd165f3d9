use crate::record::{CallInvocation, RecordTable};

/// All recorded calls to `function_name` made by one object, in source order.
///
/// Only the object's own script is searched; calls are not inherited.
pub fn calls_for<'r>(
    records: &'r RecordTable,
    object_id: &str,
    function_name: &str,
) -> Vec<&'r CallInvocation> {
    records
        .get(object_id)
        .map(|record| {
            record
                .calls
                .iter()
                .filter(|call| call.name == function_name)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_calls_for_filters_by_name() {
        let mut records = RecordTable::new();
        records.insert(
            "oKWBurning",
            tokenize("effect_add(oEFFire, 3)\nsound_play(sndFire)\neffect_add(oEFLabel, \"burn\")\n"),
        );

        let calls = calls_for(&records, "oKWBurning", "effect_add");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["oEFFire", "3"]);
        assert_eq!(calls[1].arg(0), Some("oEFLabel"));
    }

    #[test]
    fn test_calls_are_not_inherited() {
        let mut records = RecordTable::new();
        records.insert("oParent", tokenize("effect_add(oEFFire, 3)\n"));
        records.insert("oChild", tokenize("name = \"child\"\n"));

        assert!(calls_for(&records, "oChild", "effect_add").is_empty());
        assert!(calls_for(&records, "oMissing", "effect_add").is_empty());
    }
}
