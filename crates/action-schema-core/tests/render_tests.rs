//! Integration tests for single-record and collection rendering

use action_schema_core::{Context, FieldOptions, RenderError, Schema, SchemaBuilder};
use rstest::{fixture, rstest};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize)]
struct User {
	id: i64,
	name: String,
	age: u32,
	email: Option<String>,
}

#[fixture]
fn john() -> User {
	User {
		id: 1,
		name: "John McClane".to_string(),
		age: 50,
		email: None,
	}
}

#[fixture]
fn user_schema() -> Schema {
	SchemaBuilder::new()
		.name("UserSchema")
		.fields(["id", "name"])
		.build()
		.unwrap()
}

#[rstest]
fn test_only_declared_fields_are_rendered(john: User, user_schema: Schema) {
	// Act
	let rendered = user_schema.render(&john).unwrap();

	// Assert
	assert_eq!(rendered, json!({"id": 1, "name": "John McClane"}));
}

#[rstest]
fn test_output_follows_definition_order() {
	// Arrange
	let schema = SchemaBuilder::new().fields(["name", "age", "id"]).build().unwrap();

	// Act
	let rendered = schema.render(&john()).unwrap();

	// Assert
	let keys: Vec<_> = rendered.as_object().unwrap().keys().cloned().collect();
	assert_eq!(keys, vec!["name", "age", "id"]);
}

#[rstest]
fn test_empty_schema_renders_empty_object(john: User) {
	let rendered = Schema::empty().render(&john).unwrap();

	assert_eq!(rendered, json!({}));
}

#[rstest]
fn test_null_attribute_is_rendered_as_null(john: User) {
	let schema = SchemaBuilder::new().field("email").build().unwrap();

	let rendered = schema.render(&john).unwrap();

	assert_eq!(rendered, json!({"email": null}));
}

#[rstest]
fn test_if_condition_excludes_field(john: User) {
	// Arrange
	let schema = SchemaBuilder::new()
		.field_with(
			"email",
			FieldOptions::new().when(|user: &Value| !user["email"].is_null()),
		)
		.build()
		.unwrap();

	// Act
	let rendered = schema.render(&john).unwrap();

	// Assert
	assert_eq!(rendered, json!({}));
}

#[rstest]
#[case(true, json!({}))]
#[case(false, json!({"age": 50}))]
fn test_unless_condition(john: User, #[case] hide: bool, #[case] expected: Value) {
	let schema = SchemaBuilder::new()
		.field_with("age", FieldOptions::new().unless(move || hide))
		.build()
		.unwrap();

	let rendered = schema.render(&john).unwrap();

	assert_eq!(rendered, expected);
}

#[rstest]
fn test_condition_reads_render_context(john: User) {
	// Arrange
	let schema = SchemaBuilder::new()
		.field("id")
		.field_with(
			"age",
			FieldOptions::new().when(|_: &Value, ctx: &Context| ctx.get("admin") == Some(&json!(true))),
		)
		.build()
		.unwrap();

	// Act
	let guest = schema.render(&john).unwrap();
	let admin = schema
		.render_with(&john, Context::new().with("admin", true))
		.unwrap();

	// Assert
	assert_eq!(guest, json!({"id": 1}));
	assert_eq!(admin, json!({"id": 1, "age": 50}));
}

#[rstest]
fn test_missing_field_names_field_and_record() {
	// Arrange
	let schema = SchemaBuilder::new().fields(["id", "nickname"]).build().unwrap();

	// Act
	let error = schema.render(&json!({"id": 1})).unwrap_err();

	// Assert
	match &error {
		RenderError::FieldMissing { field, record } => {
			assert_eq!(field, "nickname");
			assert!(record.contains("\"id\":1"));
		}
		other => panic!("expected FieldMissing, got {:?}", other),
	}
	assert_eq!(error.field_name(), Some("nickname"));
}

#[rstest]
fn test_alias_and_source() {
	// Arrange
	let schema = SchemaBuilder::new()
		.field_with("name", FieldOptions::new().rename("fullName"))
		.field_with("years", FieldOptions::new().source("age"))
		.build()
		.unwrap();

	// Act
	let rendered = schema.render(&john()).unwrap();

	// Assert
	assert_eq!(rendered, json!({"fullName": "John McClane", "years": 50}));
}

#[rstest]
fn test_alias_collision_is_last_write_wins() {
	let schema = SchemaBuilder::new()
		.field_with("id", FieldOptions::new().rename("key"))
		.field_with("name", FieldOptions::new().rename("key"))
		.build()
		.unwrap();

	let rendered = schema.render(&john()).unwrap();

	assert_eq!(rendered, json!({"key": "John McClane"}));
}

#[rstest]
fn test_computed_fields_receive_record_and_context(john: User) {
	// Arrange
	let schema = SchemaBuilder::new()
		.computed("constant", || "fixed")
		.computed("shout", |user: &Value| {
			user["name"].as_str().unwrap_or_default().to_uppercase()
		})
		.computed("greeting", |user: &Value, ctx: &Context| {
			format!(
				"{} {}",
				ctx.get("salutation").and_then(Value::as_str).unwrap_or("Hi"),
				user["name"].as_str().unwrap_or_default()
			)
		})
		.context("salutation", "Yippee-ki-yay")
		.build()
		.unwrap();

	// Act
	let rendered = schema.render(&john).unwrap();

	// Assert
	assert_eq!(
		rendered,
		json!({
			"constant": "fixed",
			"shout": "JOHN MCCLANE",
			"greeting": "Yippee-ki-yay John McClane"
		})
	);
}

#[rstest]
fn test_refine_post_processes_computed_value(john: User) {
	let schema = SchemaBuilder::new()
		.computed_with(
			"age_next_year",
			|user: &Value| user["age"].as_u64().unwrap_or_default() + 1,
			FieldOptions::new().refine(|value: Value| value.to_string()),
		)
		.build()
		.unwrap();

	let rendered = schema.render(&john).unwrap();

	assert_eq!(rendered, json!({"age_next_year": "51"}));
}

#[rstest]
fn test_inherited_schema_extends_and_omits(user_schema: Schema) {
	// Arrange
	let admin = user_schema
		.extend()
		.name("AdminSchema")
		.field("age")
		.omit(["id"])
		.build()
		.unwrap();

	// Act
	let parent = user_schema.render(&john()).unwrap();
	let child = admin.render(&john()).unwrap();

	// Assert
	assert_eq!(parent, json!({"id": 1, "name": "John McClane"}));
	assert_eq!(child, json!({"name": "John McClane", "age": 50}));
}

#[rstest]
fn test_collection_renders_each_record_in_order(user_schema: Schema) {
	// Arrange
	let users = vec![
		john(),
		User {
			id: 2,
			name: "Holly Gennero".to_string(),
			age: 40,
			email: Some("holly@nakatomi.example".to_string()),
		},
	];

	// Act
	let rendered = user_schema.render(&users).unwrap();

	// Assert
	assert_eq!(
		rendered,
		json!([
			{"id": 1, "name": "John McClane"},
			{"id": 2, "name": "Holly Gennero"}
		])
	);
}

#[rstest]
fn test_empty_collection_renders_empty_array(user_schema: Schema) {
	let rendered = user_schema.render(&Vec::<User>::new()).unwrap();

	assert_eq!(rendered, json!([]));
}

#[rstest]
fn test_failing_record_fails_whole_collection(user_schema: Schema) {
	let records = json!([{"id": 1, "name": "John"}, {"id": 2}]);

	let error = user_schema.render(&records).unwrap_err();

	assert!(matches!(error, RenderError::FieldMissing { ref field, .. } if field == "name"));
}

#[rstest]
fn test_merged_attributes_are_appended_and_win(user_schema: Schema) {
	// Act
	let rendered = user_schema
		.renderer()
		.merge([("name", json!("Redacted")), ("meta", json!({"v": 1}))])
		.render(&john())
		.unwrap();

	// Assert
	assert_eq!(
		rendered,
		json!({"id": 1, "name": "Redacted", "meta": {"v": 1}})
	);
}

#[rstest]
fn test_merged_attributes_apply_to_every_record(user_schema: Schema) {
	let rendered = user_schema
		.renderer()
		.merge([("kind", json!("user"))])
		.render(&vec![john(), john()])
		.unwrap();

	assert_eq!(rendered[0]["kind"], json!("user"));
	assert_eq!(rendered[1]["kind"], json!("user"));
}

#[rstest]
fn test_scalar_renderable_with_fields_is_field_missing(user_schema: Schema) {
	let error = user_schema.render(&42).unwrap_err();

	assert!(matches!(error, RenderError::FieldMissing { .. }));
}

#[rstest]
fn test_rendering_twice_is_stable(user_schema: Schema) {
	let first = user_schema.render(&john()).unwrap();
	let second = user_schema.render(&john()).unwrap();

	assert_eq!(first, second);
}
