//! Template filters exposing the event detail query surface.
//!
//! Registered once into the base engine at process start, so template
//! authors get the same graceful lookup semantics as Rust callers: unknown
//! names come back as null-valued placeholders and never abort a render.

use std::collections::HashMap;

use serde_json::Value;
use tera::Tera;

use super::model::{EventDetail, EventDetails};

/// Register the fixed filter set into an engine instance.
pub(crate) fn register_filters(tera: &mut Tera) {
    tera.register_filter("with_tag", with_tag);
    tera.register_filter("general", general);
    tera.register_filter("with_names", with_names);
    tera.register_filter("has", has);
    tera.register_filter("has_tag", has_tag);
    tera.register_filter("detail", detail);
    tera.register_filter("detail_value", detail_value);
    tera.register_filter("to_map", to_map);
    tera.register_filter("label_or_name", label_or_name);
}

fn detail_list(value: &Value, filter: &str) -> tera::Result<EventDetails> {
    serde_json::from_value(value.clone()).map_err(|_| {
        tera::Error::msg(format!("the `{filter}` filter expects a list of event details"))
    })
}

fn string_arg(args: &HashMap<String, Value>, name: &str, filter: &str) -> tera::Result<String> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            tera::Error::msg(format!("the `{filter}` filter requires a string `{name}` argument"))
        })
}

/// `details | with_tag(tag="metrics")` keeps details carrying exactly `tag`.
pub fn with_tag(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "with_tag")?;
    let tag = string_arg(args, "tag", "with_tag")?;

    Ok(serde_json::to_value(details.with_tag(&tag))?)
}

/// `details | general` keeps the untagged details.
pub fn general(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "general")?;

    Ok(serde_json::to_value(details.general())?)
}

/// `details | with_names(names=["cpu", "mem"])` keeps the named subset in
/// list order.
pub fn with_names(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "with_names")?;
    let names = args
        .get("names")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .ok_or_else(|| tera::Error::msg("the `with_names` filter requires a `names` array argument"))?;

    Ok(serde_json::to_value(details.with_names(&names))?)
}

/// `details | has(name="cpu")` reports whether any detail carries the name.
pub fn has(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "has")?;
    let name = string_arg(args, "name", "has")?;

    Ok(Value::Bool(details.has(&name)))
}

/// `details | has_tag(tag="metrics")` reports whether any detail carries
/// the tag.
pub fn has_tag(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "has_tag")?;
    let tag = string_arg(args, "tag", "has_tag")?;

    Ok(Value::Bool(details.has_tag(&tag)))
}

/// `details | detail(name="cpu")` returns the first match, or a null-valued
/// placeholder when the name is absent.
pub fn detail(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "detail")?;
    let name = string_arg(args, "name", "detail")?;

    Ok(serde_json::to_value(details.get(&name))?)
}

/// `details | detail_value(name="cpu")` returns the matched value, null when
/// absent.
pub fn detail_value(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "detail_value")?;
    let name = string_arg(args, "name", "detail_value")?;

    Ok(details.get_value(&name))
}

/// `details | to_map` returns a name-to-value object; unnamed entries are
/// skipped.
pub fn to_map(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let details = detail_list(value, "to_map")?;

    Ok(Value::Object(details.to_map()))
}

/// `entry | label_or_name` returns the display name of a single detail.
/// Null input, as produced by lookups over missing names, becomes "".
pub fn label_or_name(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    if value.is_null() {
        return Ok(Value::String(String::new()));
    }

    let entry: EventDetail = serde_json::from_value(value.clone())
        .map_err(|_| tera::Error::msg("the `label_or_name` filter expects an event detail"))?;

    Ok(Value::String(entry.label_or_name().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type FilterFn = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

    fn apply(filter: FilterFn, input: Value, args: &[(&str, Value)]) -> tera::Result<Value> {
        let args: HashMap<String, Value> =
            args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        filter(&input, &args)
    }

    fn details() -> Value {
        json!([
            {"Name": "cpu", "Label": "CPU load", "Value": 0.93, "Tag": "metrics"},
            {"Name": "mem", "Label": "", "Value": 2048, "Tag": "metrics"},
            {"Name": "region", "Label": "Region", "Value": "eu-west-1", "Tag": ""}
        ])
    }

    #[test]
    fn test_with_tag_filter() {
        let result = apply(with_tag, details(), &[("tag", json!("metrics"))]).unwrap();

        let list = result.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["Name"], "cpu");
    }

    #[test]
    fn test_general_filter() {
        let result = apply(general, details(), &[]).unwrap();

        let list = result.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["Name"], "region");
    }

    #[test]
    fn test_with_names_filter() {
        let result =
            apply(with_names, details(), &[("names", json!(["region", "cpu"]))]).unwrap();

        let list = result.as_array().unwrap();
        assert_eq!(list[0]["Name"], "cpu");
        assert_eq!(list[1]["Name"], "region");
    }

    #[test]
    fn test_has_and_has_tag_filters() {
        assert_eq!(apply(has, details(), &[("name", json!("cpu"))]).unwrap(), json!(true));
        assert_eq!(apply(has, details(), &[("name", json!("disk"))]).unwrap(), json!(false));
        assert_eq!(apply(has_tag, details(), &[("tag", json!("metrics"))]).unwrap(), json!(true));
        assert_eq!(apply(has_tag, details(), &[("tag", json!("billing"))]).unwrap(), json!(false));
    }

    #[test]
    fn test_detail_filter_returns_placeholder() {
        let found = apply(detail, details(), &[("name", json!("disk"))]).unwrap();

        assert_eq!(found["Name"], "disk");
        assert_eq!(found["Label"], "disk");
        assert!(found["Value"].is_null());
    }

    #[test]
    fn test_detail_value_filter() {
        assert_eq!(
            apply(detail_value, details(), &[("name", json!("mem"))]).unwrap(),
            json!(2048)
        );
        assert!(apply(detail_value, details(), &[("name", json!("disk"))]).unwrap().is_null());
    }

    #[test]
    fn test_to_map_filter() {
        let map = apply(to_map, details(), &[]).unwrap();

        assert_eq!(map["cpu"], json!(0.93));
        assert_eq!(map["region"], json!("eu-west-1"));
    }

    #[test]
    fn test_label_or_name_filter() {
        let entry = json!({"Name": "mem", "Label": "", "Value": 1, "Tag": ""});
        assert_eq!(apply(label_or_name, entry, &[]).unwrap(), json!("mem"));

        let entry = json!({"Name": "cpu", "Label": "CPU load", "Value": 1, "Tag": ""});
        assert_eq!(apply(label_or_name, entry, &[]).unwrap(), json!("CPU load"));
    }

    #[test]
    fn test_label_or_name_filter_accepts_null() {
        assert_eq!(apply(label_or_name, Value::Null, &[]).unwrap(), json!(""));
    }

    #[test]
    fn test_filters_reject_non_list_input() {
        let err = apply(with_tag, json!("oops"), &[("tag", json!("metrics"))]).unwrap_err();

        assert!(err.to_string().contains("with_tag"));
    }

    #[test]
    fn test_with_tag_requires_tag_argument() {
        assert!(apply(with_tag, details(), &[]).is_err());
    }
}
