//! OpenAPI 3 description of the registry API, served at `GET /openapi.json`.

use serde_json::{json, Value};

fn envelope(data: Value) -> Value {
    json!({
        "type": "object",
        "required": ["success", "request_id"],
        "properties": {
            "success": { "type": "boolean" },
            "data": data,
            "error": { "type": "string", "nullable": true },
            "request_id": { "type": "string" }
        }
    })
}

fn reply(description: &str, data: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": envelope(data) } }
    })
}

fn failure(description: &str) -> Value {
    reply(description, json!({ "nullable": true }))
}

fn model_id_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "required": ["model_id"],
                    "properties": { "model_id": { "type": "string" } }
                }
            }
        }
    })
}

/// The full document.
pub fn document() -> Value {
    let text = json!({ "type": "string" });
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "heartml",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Registry and serving API for heart-disease classifiers"
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Liveness and model count",
                    "responses": {
                        "200": { "description": "Store reachable" },
                        "503": { "description": "Store unreachable" }
                    }
                }
            },
            "/model/add": {
                "post": {
                    "summary": "Register an untrained model",
                    "parameters": [
                        {
                            "name": "model_name",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string", "enum": ["logreg", "svc"] }
                        },
                        {
                            "name": "model_params",
                            "in": "query",
                            "required": false,
                            "description": "JSON object of hyperparameters",
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": {
                        "200": reply("Model <name> added, id: <id>", text.clone()),
                        "500": failure("Unknown variant or invalid hyperparameters"),
                        "503": failure("Dataset or store unavailable")
                    }
                }
            },
            "/model/list": {
                "get": {
                    "summary": "Registered models keyed by id",
                    "responses": {
                        "200": reply(
                            "Map of id to metadata, or the text `No models added`",
                            json!({ "oneOf": [{ "type": "object" }, { "type": "string" }] })
                        ),
                        "503": failure("Store unavailable")
                    }
                }
            },
            "/model/delete": {
                "delete": {
                    "summary": "Remove a model",
                    "requestBody": model_id_body(),
                    "responses": {
                        "200": reply("Model <id> deleted", text.clone()),
                        "404": failure("No such model")
                    }
                }
            },
            "/model/train": {
                "post": {
                    "summary": "Fit a model on its training split",
                    "requestBody": model_id_body(),
                    "responses": {
                        "200": reply("Model <id> trained", text),
                        "404": failure("No such model"),
                        "409": failure("Concurrent update"),
                        "503": failure("Training data unusable")
                    }
                }
            },
            "/model/predict": {
                "post": {
                    "summary": "Labels for the held-out split",
                    "requestBody": model_id_body(),
                    "responses": {
                        "200": reply(
                            "One 0/1 label per held-out row",
                            json!({ "type": "array", "items": { "type": "integer", "enum": [0, 1] } })
                        ),
                        "404": failure("No such model"),
                        "409": failure("Model not trained")
                    }
                }
            }
        }
    })
}
