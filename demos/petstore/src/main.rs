//! Petstore Example
//!
//! Demonstrates openfetch against the Swagger Petstore API: typed wrappers
//! over path templates, query parameters, JSON bodies and middleware.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use openfetch::header::{AUTHORIZATION, HeaderValue};
use openfetch::middleware::{LoggingMiddleware, request_fn};
use openfetch::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// A pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to add a pet.
#[derive(Debug, Clone, Serialize)]
pub struct NewPet {
    pub name: String,
    #[serde(rename = "photoUrls")]
    pub photo_urls: Vec<String>,
    pub status: Option<String>,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// Outcome of a typed call.
#[derive(Debug)]
pub enum Reply<T> {
    Ok(T),
    Failed { status: u16, error: Payload },
}

// ============================================================================
// Typed wrapper over the generic client
// ============================================================================

/// Petstore API client.
#[derive(Debug, Clone)]
pub struct PetstoreApi {
    client: Client,
}

impl PetstoreApi {
    pub fn new(base_url: impl Into<String>, token: &'static str) -> Self {
        let client = Client::builder(base_url)
            .header("Accept", "application/json")
            .middleware(request_fn("auth", move |request, _options| {
                let request = request
                    .to_builder()
                    .header(AUTHORIZATION, HeaderValue::from_static(token))
                    .build();
                Ok(Outcome::request(request))
            }))
            .middleware(LoggingMiddleware::new())
            .build();
        Self { client }
    }

    /// Get a pet by id.
    pub async fn get_pet(&self, pet_id: u64) -> Result<Reply<Pet>> {
        let result = self
            .client
            .get("/pet/{petId}", Params::new().path("petId", pet_id))
            .await?;
        typed(result)
    }

    /// Find pets by status.
    pub async fn find_by_status(&self, status: &str) -> Result<Reply<Vec<Pet>>> {
        let result = self
            .client
            .get("/pet/findByStatus", Params::new().query("status", status))
            .await?;
        typed(result)
    }

    /// Add a pet.
    pub async fn add_pet(&self, pet: &NewPet) -> Result<Reply<Pet>> {
        let result = self.client.post("/pet", CallOptions::new().body(pet)?).await?;
        typed(result)
    }
}

fn typed<T: serde::de::DeserializeOwned>(result: FetchResult) -> Result<Reply<T>> {
    match result {
        FetchResult::Data { data, .. } => Ok(Reply::Ok(data.json()?)),
        FetchResult::Error { error, response } => Ok(Reply::Failed {
            status: response.status(),
            error,
        }),
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> openfetch::Result<()> {
    let base_url = std::env::var("PETSTORE_URL")
        .unwrap_or_else(|_| "https://petstore3.swagger.io/api/v3/".to_string());
    let petstore = PetstoreApi::new(base_url, "Bearer special-key");

    println!("Petstore client created!");
    println!("Base URL: {}", petstore.client.config().base_url());

    match petstore.find_by_status("available").await {
        Ok(Reply::Ok(pets)) => println!("{} pets available", pets.len()),
        Ok(Reply::Failed { status, error }) => println!("failed with {status}: {error:?}"),
        Err(err) => println!("call aborted: {err}"),
    }

    match petstore.get_pet(1).await? {
        Reply::Ok(pet) => println!("pet #1 is {}", pet.name),
        Reply::Failed { status, error } => {
            let message = error
                .json::<ApiError>()
                .map_or_else(|_| format!("{error:?}"), |error| error.message);
            println!("pet #1 not available ({status}): {message}");
        }
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    fn rex() -> Pet {
        Pet {
            id: 1,
            name: "Rex".to_string(),
            status: Some("available".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_pet() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pet/1"))
            .and(header("Authorization", "Bearer test"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rex()))
            .mount(&mock_server)
            .await;

        let petstore = PetstoreApi::new(mock_server.uri(), "Bearer test");
        let reply = petstore.get_pet(1).await.expect("call");

        let Reply::Ok(pet) = reply else {
            panic!("expected a pet");
        };
        assert_eq!(pet, rex());
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pet/findByStatus"))
            .and(query_param("status", "available"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![rex()]))
            .mount(&mock_server)
            .await;

        let petstore = PetstoreApi::new(mock_server.uri(), "Bearer test");
        let reply = petstore.find_by_status("available").await.expect("call");

        let Reply::Ok(pets) = reply else {
            panic!("expected pets");
        };
        assert_eq!(pets.len(), 1);
    }

    #[tokio::test]
    async fn test_add_pet() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pet"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "name": "Rex",
                "photoUrls": [],
                "status": "available"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(rex()))
            .mount(&mock_server)
            .await;

        let petstore = PetstoreApi::new(mock_server.uri(), "Bearer test");
        let reply = petstore
            .add_pet(&NewPet {
                name: "Rex".to_string(),
                photo_urls: Vec::new(),
                status: Some("available".to_string()),
            })
            .await
            .expect("call");

        assert!(matches!(reply, Reply::Ok(pet) if pet.id == 1));
    }

    #[tokio::test]
    async fn test_get_missing_pet() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pet/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Pet not found"})),
            )
            .mount(&mock_server)
            .await;

        let petstore = PetstoreApi::new(mock_server.uri(), "Bearer test");
        let reply = petstore.get_pet(99).await.expect("call");

        let Reply::Failed { status, error } = reply else {
            panic!("expected a failure");
        };
        assert_eq!(status, 404);
        assert_eq!(error.json::<ApiError>().expect("api error").message, "Pet not found");
    }
}
