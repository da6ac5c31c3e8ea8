use serde::{Deserialize, Serialize};

/// Body of `POST /service/echo`.
///
/// `word` may be absent or `null`; it is echoed back as is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoData {
    pub word: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EchoResponseData {
    pub word: Option<String>,
}

impl From<EchoData> for EchoResponseData {
    fn from(data: EchoData) -> Self {
        Self { word: data.word }
    }
}

/// Fixed-shape status payload shared by the health and payment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    pub code: u16,
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_no: Option<String>,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: 200,
            status: true,
            reference_no: None,
            message: message.into(),
        }
    }

    pub fn with_reference(mut self, reference_no: impl Into<String>) -> Self {
        self.reference_no = Some(reference_no.into());
        self
    }
}
