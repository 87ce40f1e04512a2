use crate::error::{RelayError, Result};
use crate::platform::{PaymentToken, PlatformMethodKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub country_code: String,
    pub currency_code: String,
    pub merchant_id: String,
    pub purpose: String,
    pub amount: Decimal,
}

impl PaymentRequest {
    pub fn from_arguments(args: &Value) -> Result<Self> {
        let options = match args {
            Value::Array(items) => items.first().and_then(Value::as_object),
            Value::Object(map) => Some(map),
            _ => None,
        };

        Ok(Self {
            country_code: required_string(options, "countryCode")?,
            currency_code: required_string(options, "currencyCode")?,
            merchant_id: required_string(options, "merchantId")?,
            purpose: required_string(options, "purpose")?,
            amount: required_amount(options, "amount")?,
        })
    }
}

fn required<'a>(options: Option<&'a Map<String, Value>>, key: &str) -> Result<&'a Value> {
    match options.and_then(|o| o.get(key)) {
        None | Some(Value::Null) => Err(RelayError::MissingArgument(key.to_string())),
        Some(value) => Ok(value),
    }
}

fn required_string(options: Option<&Map<String, Value>>, key: &str) -> Result<String> {
    required(options, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RelayError::InvalidArgument {
            field: key.to_string(),
            expected: "a string",
        })
}

fn required_amount(options: Option<&Map<String, Value>>, key: &str) -> Result<Decimal> {
    let invalid = || RelayError::InvalidArgument {
        field: key.to_string(),
        expected: "a number",
    };

    let Value::Number(number) = required(options, key)? else {
        return Err(invalid());
    };

    // Parse the literal so 9.99 stays 9.99 instead of its binary approximation.
    let literal = number.to_string();
    Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|_| invalid())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    Debit,
    Credit,
    Store,
    Prepaid,
    Unknown,
}

impl From<PlatformMethodKind> for PaymentMethodType {
    fn from(kind: PlatformMethodKind) -> Self {
        match kind {
            PlatformMethodKind::Debit => PaymentMethodType::Debit,
            PlatformMethodKind::Credit => PaymentMethodType::Credit,
            PlatformMethodKind::Store => PaymentMethodType::Store,
            PlatformMethodKind::Prepaid => PaymentMethodType::Prepaid,
            PlatformMethodKind::EMoney | PlatformMethodKind::Unknown => PaymentMethodType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodInfo {
    pub network: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub display_name: String,
}

// Method fields are also nested under `paymentMethod` for Cordova-era callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    // Token object, or "" when the token is not a JSON object.
    pub payment_data: Value,
    pub transaction_identifier: String,
    pub network: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub display_name: String,
    pub payment_method: PaymentMethodInfo,
}

impl PaymentPayload {
    pub fn from_token(token: &PaymentToken) -> Self {
        let payment_data = match serde_json::from_slice::<Map<String, Value>>(&token.payment_data) {
            Ok(object) => Value::Object(object),
            Err(e) => {
                tracing::debug!("Payment token is not a JSON object ({}), sending empty data", e);
                Value::String(String::new())
            }
        };

        let method = PaymentMethodInfo {
            network: token.payment_method.network.clone().unwrap_or_default(),
            kind: token.payment_method.kind.into(),
            display_name: token.payment_method.display_name.clone().unwrap_or_default(),
        };

        Self {
            payment_data,
            transaction_identifier: token.transaction_identifier.clone(),
            network: method.network.clone(),
            kind: method.kind,
            display_name: method.display_name.clone(),
            payment_method: method,
        }
    }
}
