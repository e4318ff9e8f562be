use serde::{Deserialize, Deserializer, Serialize};

// The browser client posts camelCase; snake_case is accepted too.

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    pub amount: f64,
    pub frequency: String,
    #[serde(alias = "paymentMethod")]
    pub payment_method: String,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgramRequest {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CareerRequest {
    pub title: String,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PayuHashRequest {
    pub txnid: Option<String>,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub udf1: String,
    #[serde(default)]
    pub udf2: String,
    #[serde(default)]
    pub udf3: String,
    #[serde(default)]
    pub udf4: String,
    #[serde(default)]
    pub udf5: String,
}

/// PayU signs the amount as text; numbers are rendered with two decimals.
fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(f64),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Text(text) => text,
        Amount::Number(n) => format!("{n:.2}"),
    })
}

#[derive(Debug, Serialize)]
pub struct PayuHashResponse {
    pub key: String,
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub phone: Option<String>,
    pub udf1: String,
    pub udf2: String,
    pub udf3: String,
    pub udf4: String,
    pub udf5: String,
    pub hash: String,
    pub action: Option<String>,
}

/// Form fields PayU posts back to the success/failure URL.
#[derive(Debug, Deserialize)]
pub struct PayuCallback {
    pub status: String,
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub hash: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub udf1: String,
    #[serde(default)]
    pub udf2: String,
    #[serde(default)]
    pub udf3: String,
    #[serde(default)]
    pub udf4: String,
    #[serde(default)]
    pub udf5: String,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayuVerifyResponse {
    pub verified: bool,
    pub status: String,
    pub txnid: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ImpactStoryRequest {
    pub name: Option<String>,
    pub program: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ImpactStoryResponse {
    pub story: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hash_request(amount: serde_json::Value) -> Result<PayuHashRequest, serde_json::Error> {
        serde_json::from_value(json!({
            "amount": amount,
            "productinfo": "Donation",
            "firstname": "Asha",
            "email": "asha@example.org"
        }))
    }

    #[test]
    fn payu_amount_accepts_text_or_number() {
        assert_eq!(hash_request(json!("500.00")).unwrap().amount, "500.00");
        assert_eq!(hash_request(json!(500)).unwrap().amount, "500.00");
        assert_eq!(hash_request(json!(249.5)).unwrap().amount, "249.50");
        assert!(hash_request(json!(true)).is_err());
    }
}
