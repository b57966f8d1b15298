use crate::social::store::StoreError;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use tracing::{debug, error};

/// Unified HTTP response envelope (`errCode`, `errMsg`, `data`).
/// `data` may be null or missing, hence `Option<T>`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "errCode")]
    pub err_code: i32,
    #[serde(rename = "errMsg", default)]
    pub err_msg: String,
    pub data: Option<T>,
}

/// Deserialize an array field, mapping `null` to an empty `Vec`.
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Read an HTTP response and decode its envelope. Shared by every remote call.
pub async fn handle_http_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<ApiResponse<T>, StoreError> {
    let status = response.status();
    // body can only be read once
    let body_bytes = response.bytes().await?;
    decode_api_response(status, &body_bytes, operation_name)
}

/// Envelope decoding, split out so it can be checked without a server.
pub fn decode_api_response<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body_bytes: &[u8],
    operation_name: &str,
) -> Result<ApiResponse<T>, StoreError> {
    let body_str = String::from_utf8_lossy(body_bytes);
    debug!("[HTTP] {} response body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {} failed, HTTP status: {}, body: {}",
            operation_name, status, body_str
        );
        return Err(StoreError::Remote {
            code: i32::from(status.as_u16()),
            message: body_str.into_owned(),
        });
    }

    let api_resp: ApiResponse<T> = serde_json::from_slice(body_bytes).map_err(|e| {
        error!(
            "[HTTP] {} could not be decoded: {:?}\nraw body: {}",
            operation_name, e, body_str
        );
        StoreError::Encoding(e)
    })?;

    if api_resp.err_code != 0 {
        error!(
            "[HTTP] {} server error, code: {}, message: {}",
            operation_name, api_resp.err_code, api_resp.err_msg
        );
        return Err(StoreError::Remote {
            code: api_resp.err_code,
            message: api_resp.err_msg,
        });
    }

    Ok(api_resp)
}
