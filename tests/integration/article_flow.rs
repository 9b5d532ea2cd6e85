use serde_json::{Value, json};
use shapeguard::{Schema, Validator, Verdict};

fn article_schema() -> Schema {
    let mut schema = Schema::from_value(&json!({
        "name": "Article",
        "properties": {
            "title": {"type": "string", "maxLength": 140, "required": true},
            "date": {
                "type": "string",
                "format": "date",
                "messages": {"format": "must be a valid %{expected} and nothing else"}
            },
            "body": {"type": "string"},
            "tags": {
                "type": "array",
                "uniqueItems": true,
                "minItems": 2,
                "items": {"type": "string", "pattern": "[a-z ]+"}
            },
            "tuple": {
                "type": "array",
                "minItems": 2,
                "maxItems": 2,
                "items": {"type": ["string", "number"]}
            },
            "author": {
                "type": "string",
                "pattern": "(?i)^[\\w ]+$",
                "required": true,
                "messages": {"required": "is essential for survival"}
            },
            "published": {"type": "boolean", "default": false},
            "category": {"type": "string"},
            "palindrome": {"type": "string"}
        },
        "patternProperties": {
            "^_": {"type": "boolean", "default": false}
        }
    }))
    .expect("compile article schema");

    if let Some(title) = schema.property_mut("title") {
        title.optional_when = Some(std::sync::Arc::new(|article: &Value| {
            article.get("published") != Some(&json!(true))
        }));
    }
    if let Some(palindrome) = schema.property_mut("palindrome") {
        *palindrome = palindrome.clone().with_conform(|value, _| {
            value
                .as_str()
                .is_some_and(|text| text.chars().eq(text.chars().rev()))
        });
    }
    schema
}

fn article() -> Value {
    json!({
        "title": "Gimme some Gurus",
        "date": "2012-02-04",
        "body": "And I will pwn your codex.",
        "tags": ["energy drinks", "code"],
        "tuple": ["string0", 103],
        "author": "cloudhead",
        "published": true,
        "category": "misc",
        "palindrome": "dennis sinned",
        "_flag": true
    })
}

fn validate_with(change: impl FnOnce(&mut Value)) -> Verdict {
    let mut document = article();
    change(&mut document);
    Validator::new()
        .validate(&mut document, &article_schema())
        .expect("verdict")
}

fn remove(key: &'static str) -> impl FnOnce(&mut Value) {
    move |document| {
        document.as_object_mut().expect("object").remove(key);
    }
}

fn set(key: &'static str, value: Value) -> impl FnOnce(&mut Value) {
    move |document| {
        document[key] = value;
    }
}

#[test]
fn conforming_article_is_valid() {
    let verdict = validate_with(|_| {});
    assert!(verdict.valid, "unexpected errors: {:?}", verdict.errors);
    assert!(verdict.errors.is_empty());
}

#[test]
fn missing_author_reports_the_custom_required_message() {
    let verdict = validate_with(remove("author"));
    assert!(!verdict.valid);
    let required: Vec<_> = verdict.errors_for("required").collect();
    assert_eq!(required.len(), 1);
    assert_eq!(required[0].property.as_deref(), Some("author"));
    assert_eq!(required[0].message, "is essential for survival");
    assert_eq!(verdict.errors.len(), 1);
}

#[test]
fn missing_optional_property_is_fine() {
    assert!(validate_with(remove("category")).valid);
}

#[test]
fn title_is_waived_for_unpublished_articles() {
    let verdict = validate_with(|document| {
        document.as_object_mut().expect("object").remove("title");
        document["published"] = json!(false);
    });
    assert!(verdict.valid);

    let verdict = validate_with(remove("title"));
    assert_eq!(verdict.errors_for("required").count(), 1);
}

#[test]
fn pattern_properties_check_matching_names() {
    let verdict = validate_with(set("_additionalFlag", json!("text")));
    assert!(!verdict.valid);
    assert_eq!(verdict.errors[0].attribute, "type");
    assert_eq!(verdict.errors[0].property.as_deref(), Some("_additionalFlag"));
}

#[test]
fn array_rules_apply_to_tags() {
    let duplicate = validate_with(set("tags", json!(["a", "a"])));
    assert_eq!(duplicate.errors_for("uniqueItems").count(), 1);

    let bad_item = validate_with(set("tags", json!(["a", "____"])));
    let pattern: Vec<_> = bad_item.errors_for("pattern").collect();
    assert_eq!(pattern.len(), 1);
    assert_eq!(pattern[0].property.as_deref(), Some("tags[1]"));

    let short = validate_with(set("tags", json!(["x"])));
    assert_eq!(short.errors_for("minItems").count(), 1);
}

#[test]
fn tuple_items_share_one_schema() {
    assert!(validate_with(set("tuple", json!([1, "two"]))).valid);
    let verdict = validate_with(set("tuple", json!(["a", true])));
    let types: Vec<_> = verdict.errors_for("type").collect();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].expected, json!(["string", "number"]));
    assert_eq!(types[0].property.as_deref(), Some("tuple[1]"));

    let verdict = validate_with(set("tuple", json!(["a", 1, 2])));
    assert_eq!(verdict.errors_for("maxItems").count(), 1);
}

#[test]
fn bad_date_uses_the_custom_format_message() {
    let verdict = validate_with(set("date", json!("bad date")));
    let format: Vec<_> = verdict.errors_for("format").collect();
    assert_eq!(format.len(), 1);
    assert_eq!(format[0].message, "must be a valid date and nothing else");
}

#[test]
fn conform_predicate_rejects_non_palindromes() {
    let verdict = validate_with(set("palindrome", json!("bad palindrome")));
    assert_eq!(verdict.errors_for("conform").count(), 1);
}

#[test]
fn author_pattern_rejects_email_addresses() {
    let verdict = validate_with(set("author", json!("email@address.com")));
    assert_eq!(verdict.errors_for("pattern").count(), 1);
}

#[test]
fn title_length_is_bounded() {
    let verdict = validate_with(set("title", json!("x".repeat(141))));
    assert_eq!(verdict.errors_for("maxLength").count(), 1);
}
