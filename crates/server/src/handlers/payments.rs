use axum::extract::State;
use axum::{Form, Json};

use crate::app_state::AppState;
use crate::errors::{ServerError, map_db_error};
use crate::models::{PayuCallback, PayuHashRequest, PayuHashResponse, PayuVerifyResponse};
use crate::payu::{PaymentFields, generate_txnid, request_hash, verify_response};
use crate::validation::{optional, required};

const DEFAULT_FREQUENCY: &str = "one-time";

/// Signs a checkout request. The salt never leaves the server; the
/// browser posts the returned fields straight to `action`.
pub async fn payu_hash(
    State(state): State<AppState>,
    Json(payload): Json<PayuHashRequest>,
) -> Result<Json<PayuHashResponse>, ServerError> {
    let amount = required("amount", &payload.amount)?;
    match amount.parse::<f64>() {
        Ok(a) if a.is_finite() && a > 0.0 => {}
        _ => return Err(ServerError::bad_request("amount must be positive")),
    }

    let txnid = optional(payload.txnid.as_deref()).unwrap_or_else(generate_txnid);
    let fields = PaymentFields {
        txnid,
        amount: amount.to_string(),
        productinfo: required("productinfo", &payload.productinfo)?.to_string(),
        firstname: required("firstname", &payload.firstname)?.to_string(),
        email: required("email", &payload.email)?.to_string(),
        udf: [
            payload.udf1,
            payload.udf2,
            payload.udf3,
            payload.udf4,
            payload.udf5,
        ],
    };

    let hash = request_hash(&state.payu.key, &state.payu.salt, &fields);
    tracing::debug!(txnid = %fields.txnid, "payu request signed");

    let PaymentFields {
        txnid,
        amount,
        productinfo,
        firstname,
        email,
        udf: [udf1, udf2, udf3, udf4, udf5],
    } = fields;

    Ok(Json(PayuHashResponse {
        key: state.payu.key.clone(),
        txnid,
        amount,
        productinfo,
        firstname,
        email,
        phone: optional(payload.phone.as_deref()),
        udf1,
        udf2,
        udf3,
        udf4,
        udf5,
        hash,
        action: state.payu.base_url.clone(),
    }))
}

/// Checks the reverse hash on PayU's callback and records the outcome as
/// a new donation row. Forged callbacks are rejected before any write.
pub async fn payu_verify(
    State(state): State<AppState>,
    Form(callback): Form<PayuCallback>,
) -> Result<Json<PayuVerifyResponse>, ServerError> {
    let fields = PaymentFields {
        txnid: callback.txnid,
        amount: callback.amount,
        productinfo: callback.productinfo,
        firstname: callback.firstname,
        email: callback.email,
        udf: [
            callback.udf1,
            callback.udf2,
            callback.udf3,
            callback.udf4,
            callback.udf5,
        ],
    };

    if !verify_response(
        &state.payu.key,
        &state.payu.salt,
        &callback.status,
        &fields,
        &callback.hash,
    ) {
        tracing::warn!(txnid = %fields.txnid, "payu callback hash mismatch");
        return Err(ServerError::bad_request("payment hash mismatch"));
    }

    // PayU may post the same callback more than once.
    let recorded = state
        .db
        .prepare("SELECT id, status FROM donations WHERE txnid = ?")
        .get(&[fields.txnid.as_str().into()])
        .await
        .map_err(|e| map_db_error(e, "payment lookup failed"))?;

    if let Some(row) = recorded {
        let id = row.i64("id").unwrap_or_default();
        tracing::info!(id, txnid = %fields.txnid, "payu callback already recorded");
        return Ok(Json(PayuVerifyResponse {
            verified: true,
            status: row.text("status").unwrap_or_default().to_string(),
            txnid: fields.txnid,
            id,
        }));
    }

    let amount: f64 = fields
        .amount
        .trim()
        .parse()
        .map_err(|_| ServerError::bad_request("invalid amount"))?;
    let frequency = optional(Some(fields.udf[0].as_str())).unwrap_or_else(|| DEFAULT_FREQUENCY.into());
    let payment_method = match optional(callback.mode.as_deref()) {
        Some(mode) => format!("payu:{}", mode.to_ascii_lowercase()),
        None => "payu".to_string(),
    };
    let status = callback.status.trim().to_ascii_lowercase();

    let result = state
        .db
        .prepare(
            "INSERT INTO donations \
             (amount, frequency, payment_method, first_name, last_name, email, txnid, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .run(&[
            amount.into(),
            frequency.into(),
            payment_method.into(),
            optional(Some(fields.firstname.as_str())).into(),
            optional(Some(callback.lastname.as_str())).into(),
            optional(Some(fields.email.as_str())).into(),
            fields.txnid.as_str().into(),
            status.as_str().into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "payment record failed"))?;

    tracing::info!(
        id = result.last_insert_rowid,
        txnid = %fields.txnid,
        status = %status,
        "payu payment recorded"
    );

    Ok(Json(PayuVerifyResponse {
        verified: true,
        status,
        txnid: fields.txnid,
        id: result.last_insert_rowid,
    }))
}
