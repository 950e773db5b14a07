//! OpenAPI 3.1 description of the HTTP surface, served at `/api/schema/`
//! and rendered interactively at `/api/docs/`.

use recipe_core::schema::{component_schemas, schema_ref};
use serde_json::{Value, json};

fn body(name: &str) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": schema_ref(name)}}}
    })
}

fn returns(description: &str, name: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": schema_ref(name)}}}
    })
}

fn returns_list(description: &str, name: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {
            "type": "array",
            "items": {"$ref": schema_ref(name)}
        }}}
    })
}

fn token_auth() -> Value {
    json!([{"tokenAuth": []}])
}

fn error(description: &str) -> Value {
    returns(description, "ErrorDetail")
}

/// Build the document. Component schemas come from the entity and payload
/// types; paths mirror the router.
#[must_use]
pub fn openapi_document() -> Value {
    let mut schemas = component_schemas();
    schemas.insert(
        "ErrorDetail".into(),
        json!({
            "type": "object",
            "required": ["detail"],
            "properties": {
                "detail": {"type": "string"},
                "field": {"type": "string", "description": "Set on validation errors"}
            }
        }),
    );

    let id_param = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": {"type": "integer", "format": "int64"}
    }]);

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Recipes API",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/api/health/": {
                "get": {
                    "summary": "Liveness probe",
                    "responses": {"200": {"description": "ok"}}
                }
            },
            "/api/schema/": {
                "get": {
                    "summary": "This document",
                    "responses": {"200": {"description": "OpenAPI document"}}
                }
            },
            "/api/docs/": {
                "get": {
                    "summary": "Interactive documentation",
                    "responses": {"200": {"description": "HTML page"}}
                }
            },
            "/api/user/create/": {
                "post": {
                    "summary": "Create an account",
                    "requestBody": body("NewUser"),
                    "responses": {
                        "201": returns("created", "User"),
                        "400": error("invalid payload or email taken")
                    }
                }
            },
            "/api/user/token/": {
                "post": {
                    "summary": "Exchange credentials for a token",
                    "requestBody": body("Credentials"),
                    "responses": {
                        "200": returns("token", "TokenResponse"),
                        "400": error("bad credentials")
                    }
                }
            },
            "/api/user/me/": {
                "get": {
                    "summary": "Current user",
                    "security": token_auth(),
                    "responses": {
                        "200": returns("profile", "User"),
                        "401": error("not authenticated")
                    }
                },
                "patch": {
                    "summary": "Update the current user",
                    "security": token_auth(),
                    "requestBody": body("UserPatch"),
                    "responses": {
                        "200": returns("profile", "User"),
                        "400": error("invalid payload"),
                        "401": error("not authenticated")
                    }
                }
            },
            "/api/recipe/recipes/": {
                "get": {
                    "summary": "Own recipes, newest first",
                    "security": token_auth(),
                    "responses": {
                        "200": returns_list("recipes", "Recipe"),
                        "401": error("not authenticated")
                    }
                },
                "post": {
                    "summary": "Create a recipe",
                    "security": token_auth(),
                    "requestBody": body("NewRecipe"),
                    "responses": {
                        "201": returns("created", "Recipe"),
                        "400": error("invalid payload"),
                        "401": error("not authenticated")
                    }
                }
            },
            "/api/recipe/recipes/{id}/": {
                "parameters": id_param,
                "get": {
                    "summary": "Recipe detail",
                    "security": token_auth(),
                    "responses": {
                        "200": returns("recipe", "Recipe"),
                        "401": error("not authenticated"),
                        "404": error("missing or not owned")
                    }
                },
                "put": {
                    "summary": "Replace a recipe",
                    "security": token_auth(),
                    "requestBody": body("NewRecipe"),
                    "responses": {
                        "200": returns("recipe", "Recipe"),
                        "400": error("invalid payload"),
                        "401": error("not authenticated"),
                        "404": error("missing or not owned")
                    }
                },
                "patch": {
                    "summary": "Update some fields of a recipe",
                    "security": token_auth(),
                    "requestBody": body("RecipePatch"),
                    "responses": {
                        "200": returns("recipe", "Recipe"),
                        "400": error("invalid payload"),
                        "401": error("not authenticated"),
                        "404": error("missing or not owned")
                    }
                },
                "delete": {
                    "summary": "Delete a recipe",
                    "security": token_auth(),
                    "responses": {
                        "204": {"description": "deleted"},
                        "401": error("not authenticated"),
                        "404": error("missing or not owned")
                    }
                }
            },
            "/api/recipe/tags/": {
                "get": {
                    "summary": "Own tags, name descending",
                    "security": token_auth(),
                    "responses": {
                        "200": returns_list("tags", "Tag"),
                        "401": error("not authenticated")
                    }
                }
            },
            "/api/recipe/ingredients/": {
                "get": {
                    "summary": "Own ingredients, name descending",
                    "security": token_auth(),
                    "responses": {
                        "200": returns_list("ingredients", "Ingredient"),
                        "401": error("not authenticated")
                    }
                }
            }
        },
        "components": {
            "schemas": schemas,
            "securitySchemes": {
                "tokenAuth": {
                    "type": "apiKey",
                    "in": "header",
                    "name": "Authorization",
                    "description": "`Token <key>` (or `Bearer <key>`) from /api/user/token/"
                }
            }
        }
    })
}

/// Swagger UI shell that loads [`openapi_document`] from `/api/schema/`.
pub const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Recipes API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/api/schema/", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn collect_refs<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match (key.as_str(), child) {
                        ("$ref", Value::String(target)) => out.push(target),
                        _ => collect_refs(child, out),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
            _ => {}
        }
    }

    #[test]
    fn every_reference_resolves() {
        let doc = openapi_document();
        let mut refs = Vec::new();
        collect_refs(&doc, &mut refs);
        assert!(!refs.is_empty());
        for target in refs {
            let pointer = target.trim_start_matches('#');
            assert!(doc.pointer(pointer).is_some(), "dangling $ref {target}");
        }
    }

    #[test]
    fn document_header_and_paths() {
        let doc = openapi_document();
        assert_eq!(doc["openapi"], "3.1.0");
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/health/",
            "/api/user/create/",
            "/api/user/token/",
            "/api/user/me/",
            "/api/recipe/recipes/",
            "/api/recipe/recipes/{id}/",
            "/api/recipe/tags/",
            "/api/recipe/ingredients/",
        ] {
            assert!(paths.contains_key(path), "{path} undocumented");
        }
        let detail = &doc["paths"]["/api/recipe/recipes/{id}/"];
        for method in ["get", "put", "patch", "delete"] {
            assert!(detail[method].is_object(), "{method} undocumented");
        }
    }

    #[test]
    fn docs_page_points_at_the_schema_route() {
        assert!(DOCS_PAGE.contains(r#"url: "/api/schema/""#));
    }
}
