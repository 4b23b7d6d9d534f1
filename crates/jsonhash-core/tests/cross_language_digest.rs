//! # Cross-Language Hash Equality Tests
//!
//! Every peer implementation must produce the same `_hash` for the same
//! logical document. These tests pin the Rust output against hard-coded
//! vectors and, when Python 3 is available, against a small independent
//! Python rendition of the algorithm (sorted keys, compact separators, only
//! `"` escaped, SHA-256, unpadded base64url, first 22 characters).
//!
//! The live vectors avoid non-integral numbers outside Python's plain
//! `repr` range, where exponent spellings differ between the languages.

use jsonhash_core::{apply, calc_hash, validate, JsonHasher, JsonNode};

const PYTHON_REFERENCE: &str = r#"
import sys, json, hashlib, base64

def h(s):
    d = hashlib.sha256(s.encode('utf-8')).digest()
    return base64.urlsafe_b64encode(d).decode().rstrip('=')[:22]

def enc(v):
    if v is None: return 'null'
    if isinstance(v, bool): return 'true' if v else 'false'
    if isinstance(v, (int, float)):
        return str(int(v)) if float(v).is_integer() else repr(float(v))
    if isinstance(v, str): return '"' + v.replace('"', '\\"') + '"'
    if isinstance(v, list): return '[' + ','.join(enc(x) for x in v) + ']'
    return '{' + ','.join(enc(k) + ':' + enc(v[k]) for k in sorted(v)) + '}'

def reduce(v):
    if isinstance(v, dict): return hash_map(v)
    if isinstance(v, list): return [reduce(x) for x in v]
    return v

def hash_map(m):
    r = {k: reduce(x) for k, x in m.items() if k != '_hash'}
    m['_hash'] = h(enc(r))
    return m['_hash']

doc = json.loads(sys.argv[1])
hash_map(doc)
print(json.dumps(doc, separators=(',', ':'), sort_keys=True), end='')
"#;

/// Hash `json_literal` with the Python reference. Returns None if Python is
/// not available.
fn python_apply(json_literal: &str) -> Option<serde_json::Value> {
    let output = std::process::Command::new("python3")
        .arg("-c")
        .arg(PYTHON_REFERENCE)
        .arg(json_literal)
        .output()
        .ok()?;

    if output.status.success() {
        serde_json::from_slice(&output.stdout).ok()
    } else {
        None
    }
}

fn rust_apply(json_literal: &str) -> serde_json::Value {
    let doc: JsonNode = serde_json::from_str(json_literal).expect("valid JSON");
    let hashed = apply(&doc).expect("apply should succeed");
    serde_json::to_value(&hashed).expect("serializable")
}

/// Check the root hash against a pinned value, then against Python.
fn assert_matches_python(json_literal: &str, expected_hash: &str) {
    let rust = rust_apply(json_literal);
    assert_eq!(rust["_hash"], expected_hash, "pinned hash differs for {json_literal}");
    if let Some(python) = python_apply(json_literal) {
        assert_eq!(
            rust, python,
            "Rust and Python hashes differ for {json_literal}"
        );
    }
}

// ---------------------------------------------------------------------------
// Hard-coded vectors
// ---------------------------------------------------------------------------

#[test]
fn test_vector_string_value() {
    let hashed = rust_apply(r#"{"key": "value"}"#);
    assert_eq!(hashed["_hash"], "5Dq88zdSRIOcAS-WM_lYYt");
}

#[test]
fn test_vector_integer_value() {
    assert_eq!(rust_apply(r#"{"key": 1}"#)["_hash"], "t4HVsGBJblqznOBwy6IeLt");
    assert_eq!(rust_apply(r#"{"key": 1.0}"#)["_hash"], "t4HVsGBJblqznOBwy6IeLt");
}

#[test]
fn test_vector_list_value() {
    let hashed = rust_apply(r#"{"key": ["value", 1.0, true]}"#);
    assert_eq!(hashed["_hash"], "nbNb1YfpgqnPfyFTyCQ5YF");
}

#[test]
fn test_vector_nested() {
    let hashed = rust_apply(r#"{"parent": [{"child": "x"}]}"#);
    assert_eq!(hashed["parent"][0]["_hash"], "fLqY_oWr_L_Ts8pRyMYHYm");
    assert_eq!(hashed["_hash"], "O5XpQzWK-fEtfQ71WJNf2h");
}

#[test]
fn test_vector_validate_mismatch() {
    let doc: JsonNode = serde_json::from_str(r#"{"a": 3, "_hash": "invalid"}"#).unwrap();
    let err = validate(&doc).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("\"invalid\""), "{message}");
    assert!(message.contains("cHeM4BrY0agsgKNQC-5Hbz"), "{message}");
}

#[test]
fn test_vector_calc_hash_of_list() {
    let list: JsonNode = serde_json::from_str(r#"["a", 1]"#).unwrap();
    assert_eq!(calc_hash(&list).unwrap(), "0SP-QOa0u9pRSq3j-F0ivA");
}

#[test]
fn test_canonical_form_of_nested_document() {
    let doc: JsonNode =
        serde_json::from_str(r#"{"z": {"b": 1}, "a": "say \"hi\"", "m": null}"#).unwrap();
    let bytes = JsonHasher::default().canonical_bytes(&doc).unwrap();
    assert_eq!(
        bytes.as_str(),
        r#"{"a":"say \"hi\"","m":null,"z":"647TzLUCMJO1b0kKRlAeiN"}"#
    );
}

// ---------------------------------------------------------------------------
// Live Python verification
// ---------------------------------------------------------------------------

#[test]
fn test_cross_language_simple_dict() {
    assert_matches_python(
        r#"{"b": 2, "a": 1, "c": "hello"}"#,
        "JkvlJt1Z9b7Vx1bpblpqCP",
    );
}

#[test]
fn test_cross_language_nested_objects() {
    assert_matches_python(
        r#"{"outer": {"z": 1, "a": 2}, "inner": {"m": [3, 2, 1], "b": true}}"#,
        "kL6C8zEY4C88R-mmAbkYyF",
    );
}

#[test]
fn test_cross_language_maps_in_lists() {
    assert_matches_python(
        r#"{"a": [[1, {"b": 2}], {}], "c": [{"d": [{"e": null}]}]}"#,
        "DVmWBd3gal6mVns7TFxMrH",
    );
}

#[test]
fn test_cross_language_empty_object() {
    assert_matches_python(r#"{}"#, "RBNvo1WzZ4oRRq0W9-hknp");
}

#[test]
fn test_cross_language_quotes_and_unicode() {
    assert_matches_python(
        r#"{"q": "say \"hi\"", "u": "café 漢字"}"#,
        "tFUtAARXZ1kUCe0VEi9Eiw",
    );
}

#[test]
fn test_cross_language_fractions() {
    assert_matches_python(
        r#"{"x": 1.5, "y": -0.25, "z": 123.456, "w": [0.1, 2]}"#,
        "TOVTBfvT7LWsEmC9mUTHyB",
    );
}

#[test]
fn test_cross_language_existing_hashes_recomputed() {
    let input = r#"{"a": {"b": 1, "_hash": ""}, "_hash": ""}"#;
    assert_matches_python(input, "aGyCrR_fCrzMa6oP_6N50z");
}
