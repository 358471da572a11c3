//! OpenAPI schema for [`ProblemDetail`]
//!
//! Written by hand because the extension members are a flattened open map, which the
//! derive can't express as `additionalProperties`.

use serde_json::json;
use utoipa::openapi::schema::{
    AdditionalProperties, KnownFormat, ObjectBuilder, Schema, SchemaFormat, SchemaType,
};
use utoipa::openapi::RefOr;
use utoipa::ToSchema;

use super::detail::{ProblemDetail, BLANK_TYPE};

fn string_member(description: &str) -> ObjectBuilder {
    ObjectBuilder::new()
        .schema_type(SchemaType::String)
        .description(Some(description))
}

impl<'s> ToSchema<'s> for ProblemDetail {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let schema = ObjectBuilder::new()
            .schema_type(SchemaType::Object)
            .description(Some("Problem details for HTTP APIs (RFC 9457)"))
            .property(
                "type",
                string_member("URI reference identifying the problem type")
                    .default(Some(json!(BLANK_TYPE))),
            )
            .required("type")
            .property(
                "title",
                string_member("Short summary of the problem type"),
            )
            .property(
                "status",
                ObjectBuilder::new()
                    .schema_type(SchemaType::Integer)
                    .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32)))
                    .description(Some("HTTP status code generated by the origin server")),
            )
            .required("status")
            .property(
                "detail",
                string_member("Explanation specific to this occurrence of the problem"),
            )
            .property(
                "instance",
                string_member("URI reference identifying this occurrence of the problem"),
            )
            .additional_properties(Some(AdditionalProperties::<Schema>::FreeForm(true)))
            .build();

        ("ProblemDetail", RefOr::T(Schema::Object(schema)))
    }
}
