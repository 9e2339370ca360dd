//! Cross-checks the two decoders against each other.
//!
//! Both strategies see the same bytes and equal index sources. A document
//! only counts as agreed when the two trees are deep-equal; failures agree
//! when they carry the same [`ErrorKind`](crate::error::ErrorKind).

use crate::decoder::{decode_dynamic, decode_structured};
use crate::error::{DecodeError, Result};
use crate::identity::SequentialIndices;
use crate::model::AnimationDocument;

/// How layer indices take part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexComparison {
    /// Generated indices must match too.
    #[default]
    Exact,
    /// Generated indices are zeroed on both sides first.
    IgnoreGenerated,
}

#[derive(Debug)]
pub enum Equivalence {
    Agree(AnimationDocument),
    BothFailed {
        structured: DecodeError,
        dynamic: DecodeError,
    },
    Diverged(Divergence),
}

impl Equivalence {
    pub fn is_agreement(&self) -> bool {
        !matches!(self, Equivalence::Diverged(_))
    }
}

#[derive(Debug)]
pub struct Divergence {
    pub structured: Result<AnimationDocument>,
    pub dynamic: Result<AnimationDocument>,
    /// First line where the two debug dumps differ.
    pub first_difference: String,
}

#[derive(Debug, Clone, Default)]
pub struct Harness {
    seed: i64,
    indices: IndexComparison,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value both sequential sources hand out.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_index_comparison(mut self, indices: IndexComparison) -> Self {
        self.indices = indices;
        self
    }

    pub fn check(&self, bytes: &[u8]) -> Equivalence {
        let structured = decode_structured(bytes, &mut SequentialIndices::starting_at(self.seed));
        let dynamic = decode_dynamic(bytes, &mut SequentialIndices::starting_at(self.seed));
        let outcome = compare(structured, dynamic, self.indices);

        if let Equivalence::Diverged(divergence) = &outcome {
            tracing::warn!(
                difference = %divergence.first_difference,
                "decoders diverged"
            );
        }
        outcome
    }
}

/// Compare two decode results produced elsewhere, e.g. with random sources.
pub fn compare(
    structured: Result<AnimationDocument>,
    dynamic: Result<AnimationDocument>,
    indices: IndexComparison,
) -> Equivalence {
    match (structured, dynamic) {
        (Ok(s), Ok(d)) => {
            let same = match indices {
                IndexComparison::Exact => s == d,
                IndexComparison::IgnoreGenerated => {
                    s.with_generated_indices_erased() == d.with_generated_indices_erased()
                }
            };
            if same {
                return Equivalence::Agree(s);
            }
            let first_difference = match indices {
                IndexComparison::Exact => first_difference(&dump(&s), &dump(&d)),
                IndexComparison::IgnoreGenerated => first_difference(
                    &dump(&s.with_generated_indices_erased()),
                    &dump(&d.with_generated_indices_erased()),
                ),
            };
            Equivalence::Diverged(Divergence {
                structured: Ok(s),
                dynamic: Ok(d),
                first_difference,
            })
        }
        (Err(s), Err(d)) if s.kind() == d.kind() => Equivalence::BothFailed {
            structured: s,
            dynamic: d,
        },
        (structured, dynamic) => {
            let first_difference = first_difference(&dump(&structured), &dump(&dynamic));
            Equivalence::Diverged(Divergence {
                structured,
                dynamic,
                first_difference,
            })
        }
    }
}

fn dump<T: std::fmt::Debug>(value: &T) -> String {
    format!("{value:#?}")
}

fn first_difference(structured: &str, dynamic: &str) -> String {
    let mut left = structured.lines();
    let mut right = dynamic.lines();
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) if l == r => line += 1,
            (None, None) => return "dumps are textually identical".to_string(),
            (l, r) => {
                return format!(
                    "line {line}: structured `{}` vs dynamic `{}`",
                    l.map_or("<end>", str::trim),
                    r.map_or("<end>", str::trim),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RandomIndices;

    const DOC: &str = r#"{
        "v": "5.7.0", "ip": 0, "op": 30, "fr": 30, "w": 64, "h": 64,
        "layers": [ { "ty": 3, "nm": "anchor", "ip": 0, "op": 30, "st": 0 } ]
    }"#;

    #[test]
    fn test_first_difference_reports_line() {
        let diff = first_difference("a\nb\nc", "a\nx\nc");
        assert_eq!(diff, "line 2: structured `b` vs dynamic `x`");

        let diff = first_difference("a", "a\nextra");
        assert_eq!(diff, "line 2: structured `<end>` vs dynamic `extra`");
    }

    #[test]
    fn test_harness_agrees_on_simple_document() {
        let outcome = Harness::new().with_seed(100).check(DOC.as_bytes());
        match outcome {
            Equivalence::Agree(doc) => assert_eq!(doc.layers()[0].index.value(), 100),
            other => panic!("expected agreement, got {other:?}"),
        }
    }

    #[test]
    fn test_same_error_kind_counts_as_agreement() {
        let outcome = Harness::new().check(br#"{ "v": "5.7.0" }"#);
        assert!(matches!(outcome, Equivalence::BothFailed { .. }));
        assert!(outcome.is_agreement());
    }

    #[test]
    fn test_independent_random_sources_need_erasure() {
        let decode_pair = || {
            (
                decode_structured(DOC.as_bytes(), &mut RandomIndices::seeded(1)),
                decode_dynamic(DOC.as_bytes(), &mut RandomIndices::seeded(2)),
            )
        };

        let (structured, dynamic) = decode_pair();
        assert!(!compare(structured, dynamic, IndexComparison::Exact).is_agreement());

        let (structured, dynamic) = decode_pair();
        assert!(compare(structured, dynamic, IndexComparison::IgnoreGenerated).is_agreement());
    }

    #[test]
    fn test_mismatched_outcomes_diverge() {
        let ok = decode_structured(DOC.as_bytes(), &mut SequentialIndices::starting_at(0));
        let err = Err(DecodeError::missing("v"));
        let outcome = compare(ok, err, IndexComparison::Exact);
        match outcome {
            Equivalence::Diverged(d) => assert!(d.first_difference.starts_with("line 1")),
            other => panic!("expected divergence, got {other:?}"),
        }
    }
}
