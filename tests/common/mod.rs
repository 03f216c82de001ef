//! Shared fixtures for the integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use userdesk_sdk::{ApiConfig, HttpClient, TokenStore};
use wiremock::MockServer;

/// Install a test-writer subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A client-context HTTP client pointed at `server`
pub fn client_for(server: &MockServer) -> (HttpClient, TokenStore) {
    init_tracing();
    let tokens = TokenStore::client();
    let config = ApiConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::new(config, tokens.clone()).expect("valid config");
    (client, tokens)
}

/// A complete user record as the backend returns it
///
/// The library's own fixture is `#[cfg(test)]` and not visible from here,
/// so integration tests keep this copy.
pub fn user_json(id: u64) -> Value {
    let address = json!({
        "address": "1745 T Street Southeast",
        "city": "Washington",
        "state": "District of Columbia",
        "stateCode": "DC",
        "postalCode": "20020",
        "coordinates": {"lat": 38.867033, "lng": -76.979235},
        "country": "United States"
    });
    json!({
        "id": id,
        "firstName": "Emily",
        "lastName": "Johnson",
        "maidenName": "Smith",
        "age": 28,
        "gender": "female",
        "email": "emily.johnson@x.dummyjson.com",
        "phone": "+81 965-431-3024",
        "username": "emilys",
        "password": "emilyspass",
        "birthDate": "1996-5-30",
        "image": "https://dummyjson.com/icon/emilys/128",
        "bloodGroup": "O-",
        "height": 193.24,
        "weight": 63.16,
        "eyeColor": "Green",
        "hair": {"color": "Brown", "type": "Curly"},
        "ip": "42.48.100.32",
        "address": address.clone(),
        "macAddress": "47:fa:41:18:ec:eb",
        "university": "University of Wisconsin--Madison",
        "bank": {
            "cardExpire": "03/26",
            "cardNumber": "9289760655481815",
            "cardType": "Elo",
            "currency": "CNY",
            "iban": "YPUXISOBI7TTHPK2BR3HAIXL"
        },
        "company": {
            "department": "Engineering",
            "name": "Dooley, Kozey and Cronin",
            "title": "Sales Manager",
            "address": address
        },
        "ein": "977-175",
        "ssn": "900-590-289",
        "userAgent": "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
        "crypto": {
            "coin": "Bitcoin",
            "wallet": "0xb9fc2fe63b2a6c003f1c324c3bfa53259162181a",
            "network": "Ethereum (ERC20)"
        },
        "role": "admin"
    })
}

/// A page of users
pub fn users_page(ids: &[u64], total: u64, skip: u64, limit: u64) -> Value {
    json!({
        "users": ids.iter().map(|id| user_json(*id)).collect::<Vec<_>>(),
        "total": total,
        "skip": skip,
        "limit": limit
    })
}

/// A successful login response
pub fn login_json(access_token: &str) -> Value {
    json!({
        "id": 1,
        "username": "emilys",
        "email": "emily.johnson@x.dummyjson.com",
        "firstName": "Emily",
        "lastName": "Johnson",
        "gender": "female",
        "image": "https://dummyjson.com/icon/emilys/128",
        "accessToken": access_token,
        "refreshToken": "refresh-token"
    })
}
