//! Integration tests for before/after render hooks

use action_schema_core::{Context, HookPhase, SchemaBuilder};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

#[rstest]
fn test_before_hook_replacement_feeds_render() {
	// Arrange
	let schema = SchemaBuilder::new()
		.field("name")
		.before_render(|_: Value| json!({"name": "Hans Gruber"}))
		.build()
		.unwrap();
	let record = json!({"name": "John McClane"});

	// Act
	let rendered = schema.render(&record).unwrap();

	// Assert
	assert_eq!(rendered, json!({"name": "Hans Gruber"}));
	assert_eq!(record, json!({"name": "John McClane"}));
}

#[rstest]
fn test_later_hooks_receive_previous_result() {
	// Arrange
	let seen = Arc::new(Mutex::new(Vec::new()));
	let observer = Arc::clone(&seen);
	let schema = SchemaBuilder::new()
		.field("step")
		.before_render(|mut value: Value| {
			value["step"] = json!(1);
			value
		})
		.before_render(move |value: Value| {
			observer.lock().push(value["step"].clone());
			let next = value["step"].as_i64().unwrap_or_default() + 1;
			json!({"step": next})
		})
		.build()
		.unwrap();

	// Act
	let rendered = schema.render(&json!({"step": 0})).unwrap();

	// Assert
	assert_eq!(*seen.lock(), vec![json!(1)]);
	assert_eq!(rendered, json!({"step": 2}));
}

#[rstest]
fn test_after_hook_transforms_output() {
	let schema = SchemaBuilder::new()
		.fields(["id"])
		.after_render(|output: Value| json!({"data": output}))
		.build()
		.unwrap();

	let rendered = schema.render(&json!({"id": 1, "secret": "x"})).unwrap();

	assert_eq!(rendered, json!({"data": {"id": 1}}));
}

#[rstest]
fn test_hooks_see_render_context() {
	let schema = SchemaBuilder::new()
		.field("id")
		.after_render(|mut output: Value, ctx: &Context| {
			if let Some(version) = ctx.get("version") {
				output["version"] = version.clone();
			}
			output
		})
		.build()
		.unwrap();

	let rendered = schema
		.render_with(&json!({"id": 1}), Context::new().with("version", 3))
		.unwrap();

	assert_eq!(rendered, json!({"id": 1, "version": 3}));
}

#[rstest]
fn test_before_hook_sees_whole_collection() {
	// Arrange
	let schema = SchemaBuilder::new()
		.field("id")
		.before_render(|value: Value| match value {
			Value::Array(mut records) => {
				records.truncate(1);
				Value::Array(records)
			}
			other => other,
		})
		.build()
		.unwrap();

	// Act
	let rendered = schema.render(&json!([{"id": 1}, {"id": 2}])).unwrap();

	// Assert
	assert_eq!(rendered, json!([{"id": 1}]));
}

#[rstest]
fn test_before_hook_can_turn_record_into_collection() {
	let schema = SchemaBuilder::new()
		.field("id")
		.before_render(|value: Value| json!([value.clone(), value]))
		.build()
		.unwrap();

	let rendered = schema.render(&json!({"id": 7})).unwrap();

	assert_eq!(rendered, json!([{"id": 7}, {"id": 7}]));
}

#[rstest]
fn test_hooks_are_inherited_and_appended() {
	// Arrange
	let base = SchemaBuilder::new()
		.field("id")
		.after_render(|mut output: Value| {
			output["trail"] = json!(["base"]);
			output
		})
		.build()
		.unwrap();

	// Act
	let child = base
		.extend()
		.after_render(|mut output: Value| {
			if let Some(trail) = output["trail"].as_array_mut() {
				trail.push(json!("child"));
			}
			output
		})
		.build()
		.unwrap();

	// Assert
	assert_eq!(base.hook_count(HookPhase::AfterRender), 1);
	assert_eq!(child.hook_count(HookPhase::AfterRender), 2);
	assert_eq!(
		child.render(&json!({"id": 1})).unwrap(),
		json!({"id": 1, "trail": ["base", "child"]})
	);
	assert_eq!(
		base.render(&json!({"id": 1})).unwrap(),
		json!({"id": 1, "trail": ["base"]})
	);
}
