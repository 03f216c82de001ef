//! Backend user records

use serde::{Deserialize, Serialize};

use super::identifiers::UserId;
use super::schema::{Checker, Schema};

/// Gender values the backend uses
pub const GENDERS: [&str; 2] = ["male", "female"];

/// User gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

/// Hair description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hair {
    /// Hair color
    pub color: String,
    /// Hair type
    #[serde(rename = "type")]
    pub hair_type: String,
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State name
    pub state: String,
    /// State code
    pub state_code: String,
    /// Postal code
    pub postal_code: String,
    /// Coordinates
    pub coordinates: Coordinates,
    /// Country
    pub country: String,
}

/// Bank card details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    /// Card expiry (MM/YY)
    pub card_expire: String,
    /// Card number
    pub card_number: String,
    /// Card type
    pub card_type: String,
    /// Currency
    pub currency: String,
    /// IBAN
    pub iban: String,
}

/// Employer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Department
    pub department: String,
    /// Company name
    pub name: String,
    /// Job title
    pub title: String,
    /// Company address
    pub address: Address,
}

/// Crypto wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crypto {
    /// Coin
    pub coin: String,
    /// Wallet address
    pub wallet: String,
    /// Network
    pub network: String,
}

/// Full backend user record
///
/// Field names mirror the backend's camelCase JSON.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: String,
    pub age: u32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub birth_date: String,
    pub image: String,
    pub blood_group: String,
    pub height: f64,
    pub weight: f64,
    pub eye_color: String,
    pub hair: Hair,
    pub ip: String,
    pub address: Address,
    pub mac_address: String,
    pub university: String,
    pub bank: Bank,
    pub company: Company,
    pub ein: String,
    pub ssn: String,
    pub user_agent: String,
    pub crypto: Crypto,
    pub role: String,
}

impl User {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn check_address(v: &mut Checker<'_>) {
    for field in ["address", "city", "state", "stateCode", "postalCode"] {
        v.string(field);
    }
    v.object("coordinates", |v| {
        v.number("lat");
        v.number("lng");
    });
    v.string("country");
}

impl Schema for User {
    fn check(v: &mut Checker<'_>) {
        v.unsigned("id");
        v.string("firstName");
        v.string("lastName");
        v.string("maidenName");
        v.unsigned32("age");
        v.one_of("gender", &GENDERS);
        v.email("email", "Invalid email");
        v.string("phone");
        v.string("username");
        v.string("password");
        v.string("birthDate");
        v.url("image");
        v.string("bloodGroup");
        v.number("height");
        v.number("weight");
        v.string("eyeColor");
        v.object("hair", |v| {
            v.string("color");
            v.string("type");
        });
        v.string("ip");
        v.object("address", check_address);
        v.string("macAddress");
        v.string("university");
        v.object("bank", |v| {
            for field in ["cardExpire", "cardNumber", "cardType", "currency", "iban"] {
                v.string(field);
            }
        });
        v.object("company", |v| {
            v.string("department");
            v.string("name");
            v.string("title");
            v.object("address", check_address);
        });
        v.string("ein");
        v.string("ssn");
        v.string("userAgent");
        v.object("crypto", |v| {
            v.string("coin");
            v.string("wallet");
            v.string("network");
        });
        v.string("role");
    }
}

/// One page of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersResponse {
    /// Users on this page
    pub users: Vec<User>,
    /// Total number of matching users
    pub total: u64,
    /// Offset of this page
    pub skip: u64,
    /// Page size
    pub limit: u64,
}

impl UsersResponse {
    /// Whether more users follow this page
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.skip + (self.users.len() as u64) < self.total
    }
}

impl Schema for UsersResponse {
    fn check(v: &mut Checker<'_>) {
        v.array_of::<User>("users");
        v.unsigned("total");
        v.unsigned("skip");
        v.unsigned("limit");
    }
}
