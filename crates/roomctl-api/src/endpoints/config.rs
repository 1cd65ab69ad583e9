// Device configuration blob endpoints
//
// Export and import move opaque files: the client never inspects the
// payload, it only carries bytes and a filename between disk and backend.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use tracing::{debug, warn};

use crate::client::{ApiClient, decode_ack};
use crate::error::Error;
use crate::models::{ConfigExport, MessageResponse};

impl ApiClient {
    /// Download the configuration of one device, or of all devices.
    ///
    /// `GET {admin}/config/export[?device_id=...]`
    pub async fn export_config(&self, device_id: Option<i64>) -> Result<ConfigExport, Error> {
        let url = self.url(&self.paths().admin_path("config/export"))?;
        let mut builder = self.request(Method::GET, url);
        if let Some(id) = device_id {
            builder = builder.query(&[("device_id", id)]);
        }
        let resp = self.send(builder).await?;

        let filename = content_disposition_filename(&resp)
            .unwrap_or_else(|| export_file_name(device_id, Utc::now()));
        let data = resp.bytes().await?;
        debug!(%filename, bytes = data.len(), "configuration exported");

        Ok(ConfigExport { filename, data })
    }

    /// Upload a configuration file, for one device or for all devices.
    ///
    /// `POST {admin}/config/import[?device_id=...]`, multipart field `file`
    pub async fn import_config(
        &self,
        file_name: &str,
        data: bytes::Bytes,
        device_id: Option<i64>,
    ) -> Result<MessageResponse, Error> {
        let url = self.url(&self.paths().admin_path("config/import"))?;
        debug!(file_name, bytes = data.len(), ?device_id, "importing configuration");

        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_owned())
            .mime_str("application/json")?;
        let mut builder = self
            .request(Method::POST, url)
            .multipart(Form::new().part("file", part));
        if let Some(id) = device_id {
            builder = builder.query(&[("device_id", id)]);
        }

        let resp = self.send(builder).await?;
        decode_ack(resp).await
    }

    /// Set one key of a stored device configuration.
    ///
    /// `PUT {admin}/config/{config_id}?key=...&value=...`
    pub async fn update_config_parameter(
        &self,
        config_id: i64,
        key: &str,
        value: &str,
    ) -> Result<MessageResponse, Error> {
        let url = self.url(&self.paths().admin_path(&format!("config/{config_id}")))?;
        debug!(config_id, key, "updating configuration parameter");
        self.acknowledge(
            Method::PUT,
            url,
            &[("key", key.to_owned()), ("value", value.to_owned())],
        )
        .await
    }
}

/// Filename used when the backend sends no `Content-Disposition`.
///
/// `config_device_<id>_<timestamp>.json` or `config_all_<timestamp>.json`,
/// with a UTC millisecond timestamp such as `2024-05-01T12:00:00.000Z`.
pub fn export_file_name(device_id: Option<i64>, now: DateTime<Utc>) -> String {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    match device_id {
        Some(id) => format!("config_device_{id}_{stamp}.json"),
        None => format!("config_all_{stamp}.json"),
    }
}

fn content_disposition_filename(resp: &Response) -> Option<String> {
    let header = resp.headers().get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let name = parse_content_disposition(header)?;
    let safe = bare_file_name(&name);
    if safe.is_none() {
        warn!(%name, "ignoring unsafe filename from Content-Disposition");
    }
    safe
}

/// The server's filename reduced to a single path component. Directory
/// parts are dropped; names that reduce to nothing, `.` or `..` are refused.
fn bare_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    Path::new(last).file_name()?.to_str().map(str::to_owned)
}

/// Pull the filename out of a `Content-Disposition` value, preferring the
/// RFC 5987 `filename*=UTF-8''...` form over plain `filename=`.
fn parse_content_disposition(header: &str) -> Option<String> {
    let params: Vec<(String, &str)> = header
        .split(';')
        .skip(1)
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), value.trim()))
        })
        .collect();

    let extended = params.iter().find(|(key, _)| key == "filename*").and_then(|(_, value)| {
        let (charset, rest) = value.split_once('\'')?;
        let (_, encoded) = rest.split_once('\'')?;
        charset
            .eq_ignore_ascii_case("utf-8")
            .then(|| percent_decode(encoded))
            .flatten()
    });

    extended
        .or_else(|| {
            params
                .iter()
                .find(|(key, _)| key == "filename")
                .map(|(_, value)| value.trim_matches('"').to_owned())
        })
        .filter(|name| !name.is_empty())
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn synthesized_names() {
        assert_eq!(
            export_file_name(Some(4), noon()),
            "config_device_4_2024-05-01T12:00:00.000Z.json"
        );
        assert_eq!(
            export_file_name(None, noon()),
            "config_all_2024-05-01T12:00:00.000Z.json"
        );
    }

    #[test]
    fn quoted_filename() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="device_4.json""#).as_deref(),
            Some("device_4.json")
        );
    }

    #[test]
    fn extended_filename_wins() {
        let header = r#"attachment; filename="fallback.json"; filename*=UTF-8''r%C3%A4um%201.json"#;
        assert_eq!(
            parse_content_disposition(header).as_deref(),
            Some("räum 1.json")
        );
    }

    #[test]
    fn directory_parts_are_stripped() {
        assert_eq!(
            bare_file_name("../../../home/op/.bashrc").as_deref(),
            Some(".bashrc")
        );
        assert_eq!(bare_file_name("configs/esp_4.json").as_deref(), Some("esp_4.json"));
        assert_eq!(bare_file_name(r"..\..\esp_4.json").as_deref(), Some("esp_4.json"));
        assert_eq!(bare_file_name("esp_4.json").as_deref(), Some("esp_4.json"));
    }

    #[test]
    fn traversal_only_names_are_refused() {
        assert_eq!(bare_file_name(".."), None);
        assert_eq!(bare_file_name("."), None);
        assert_eq!(bare_file_name("configs/"), None);
        assert_eq!(bare_file_name("/"), None);
    }

    #[test]
    fn missing_filename() {
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }
}
