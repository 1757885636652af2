// tests/unit_minhash.rs
use copycat_core::estimator::estimate;
use copycat_core::index::quick_similarity;
use copycat_core::{CopycatError, SignatureGenerator};

const TOTAL: &str = "def calculate_total(numbers):
    total = 0
    for number in numbers:
        total += number
    return total
";

const TOTAL_RENAMED: &str = "def calculate_total(values):
    total = 0
    for number in values:
        total += number
    return total
";

const SORT: &str = "def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        for j in range(0, n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
    return arr
";

#[test]
fn test_signature_is_deterministic() {
    let a = SignatureGenerator::new(128, 3);
    let b = SignatureGenerator::new(128, 3);
    for text in [TOTAL, SORT, "", "x", "  \n\t "] {
        assert_eq!(a.compute_signature(text), a.compute_signature(text));
        assert_eq!(a.compute_signature(text), b.compute_signature(text));
    }
}

#[test]
fn test_self_estimate_is_one() {
    let gen = SignatureGenerator::default();
    for text in [TOTAL, SORT, "ab"] {
        let s = gen.compute_signature(text);
        assert_eq!(estimate(&s, &s), Ok(1.0));
    }
    assert_eq!(estimate(&[], &[]), Ok(1.0));
}

#[test]
fn test_mismatched_lengths_fail() {
    let long = SignatureGenerator::new(128, 3).compute_signature(TOTAL);
    let short = SignatureGenerator::new(64, 3).compute_signature(TOTAL);
    assert_eq!(
        estimate(&long, &short),
        Err(CopycatError::SizeMismatch {
            left: 128,
            right: 64
        })
    );
}

#[test]
fn test_renamed_variables_stay_similar() {
    let gen = SignatureGenerator::new(128, 3);
    let s = estimate(
        &gen.compute_signature(TOTAL),
        &gen.compute_signature(TOTAL_RENAMED),
    )
    .unwrap_or(0.0);
    assert!(s >= 0.6, "renamed copy should be >= 60%, got {s}");
}

#[test]
fn test_unrelated_functions_score_low() {
    let near = quick_similarity(TOTAL, TOTAL_RENAMED, 128).unwrap_or(0.0);
    let far = quick_similarity(TOTAL, SORT, 128).unwrap_or(1.0);
    assert!(far < 0.3, "unrelated code should be < 30%, got {far}");
    assert!(far < near);
}

#[test]
fn test_formatting_is_ignored() {
    let reflowed = TOTAL.replace("    ", "\t").to_uppercase();
    assert_eq!(quick_similarity(TOTAL, &reflowed, 128), Ok(1.0));
}
