use serde::Serialize;

/// Every endpoint answers with the same wrapper: `{"success": true, "data": ...}`
/// on the happy path, `{"success": false, "error": "..."}` otherwise.
#[derive(Serialize, Debug)]
pub struct Envelope<T: Serialize>{
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl<T: Serialize> Envelope<T>{
    pub fn ok(data: T) -> Self{
        Envelope{
            success: true,
            data: Some(data),
            error: None
        }
    }
}

impl Envelope<()>{
    pub fn error(message: impl Into<String>) -> Self{
        Envelope{
            success: false,
            data: None,
            error: Some(message.into())
        }
    }

    pub fn empty() -> Self{
        Envelope{
            success: true,
            data: None,
            error: None
        }
    }
}
