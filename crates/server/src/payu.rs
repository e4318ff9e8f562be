//! PayU hosted-checkout hashing.
//!
//! Request: `sha512(key|txnid|amount|productinfo|firstname|email|udf1..udf5||||||salt)`.
//! Response: the same fields reversed behind `salt|status`.
use rand::Rng;
use sha2::{Digest, Sha512};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFields {
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub udf: [String; 5],
}

pub fn request_hash_input(key: &str, salt: &str, f: &PaymentFields) -> String {
    let [udf1, udf2, udf3, udf4, udf5] = &f.udf;
    format!(
        "{key}|{}|{}|{}|{}|{}|{udf1}|{udf2}|{udf3}|{udf4}|{udf5}||||||{salt}",
        f.txnid, f.amount, f.productinfo, f.firstname, f.email
    )
}

pub fn response_hash_input(key: &str, salt: &str, status: &str, f: &PaymentFields) -> String {
    let [udf1, udf2, udf3, udf4, udf5] = &f.udf;
    format!(
        "{salt}|{status}||||||{udf5}|{udf4}|{udf3}|{udf2}|{udf1}|{}|{}|{}|{}|{}|{key}",
        f.email, f.firstname, f.productinfo, f.amount, f.txnid
    )
}

pub fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn request_hash(key: &str, salt: &str, fields: &PaymentFields) -> String {
    sha512_hex(&request_hash_input(key, salt, fields))
}

pub fn response_hash(key: &str, salt: &str, status: &str, fields: &PaymentFields) -> String {
    sha512_hex(&response_hash_input(key, salt, status, fields))
}

pub fn verify_response(
    key: &str,
    salt: &str,
    status: &str,
    fields: &PaymentFields,
    received_hash: &str,
) -> bool {
    response_hash(key, salt, status, fields).eq_ignore_ascii_case(received_hash.trim())
}

pub fn generate_txnid() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("TXN{millis}{suffix:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PaymentFields {
        PaymentFields {
            txnid: "TXN1".into(),
            amount: "500.00".into(),
            productinfo: "Donation".into(),
            firstname: "Asha".into(),
            email: "asha@example.org".into(),
            udf: ["monthly".into(), String::new(), String::new(), String::new(), String::new()],
        }
    }

    #[test]
    fn request_input_layout() {
        assert_eq!(
            request_hash_input("KEY", "SALT", &fields()),
            "KEY|TXN1|500.00|Donation|Asha|asha@example.org|monthly||||||||||SALT"
        );
    }

    #[test]
    fn response_input_layout() {
        assert_eq!(
            response_hash_input("KEY", "SALT", "success", &fields()),
            "SALT|success||||||||||monthly|asha@example.org|Asha|Donation|500.00|TXN1|KEY"
        );
    }

    #[test]
    fn hash_is_lowercase_sha512_hex() {
        let hash = request_hash("KEY", "SALT", &fields());
        assert_eq!(hash.len(), 128);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            sha512_hex(""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn verification_detects_tampering() {
        let f = fields();
        let hash = response_hash("KEY", "SALT", "success", &f);
        assert!(verify_response("KEY", "SALT", "success", &f, &hash));
        assert!(verify_response("KEY", "SALT", "success", &f, &hash.to_uppercase()));
        assert!(!verify_response("KEY", "SALT", "failure", &f, &hash));

        let mut tampered = f.clone();
        tampered.amount = "5.00".into();
        assert!(!verify_response("KEY", "SALT", "success", &tampered, &hash));
    }

    #[test]
    fn txnids_are_unique_enough() {
        let a = generate_txnid();
        assert!(a.starts_with("TXN"));
        assert!(a.len() > 15);
    }
}
