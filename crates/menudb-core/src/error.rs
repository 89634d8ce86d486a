use serde::Serialize;
use thiserror::Error;

/// Client-caused problems with a search request. Always reported as 400.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Modo de búsqueda inválido: '{0}'. Usa 'vector', 'fulltext' o 'hybrid'.")]
    InvalidMode(String),

    #[error("La descripción es obligatoria para el modo '{mode}'.")]
    MissingDescription { mode: String },

    #[error("El título es obligatorio para el modo '{mode}'.")]
    MissingTitle { mode: String },

    #[error("Formato numérico inválido para '{field}': '{value}'.")]
    InvalidNumericFormat { field: &'static str, value: String },

    #[error("El precio máximo no puede ser negativo: {0}.")]
    NegativePrice(f64),

    #[error("El filtro de disponibilidad debe ser 'true' o 'false', se recibió '{0}'.")]
    InvalidAvailability(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuración incompleta: {0}")]
    Configuration(String),

    #[error("No se pudo construir la búsqueda: {0}")]
    Plan(String),

    #[error("Error al generar el embedding de la consulta: {0}")]
    Embedding(String),

    #[error("Error al ejecutar la búsqueda: {0}")]
    Retrieval(String),
}

impl SearchError {
    /// HTTP-equivalent status classification.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Configuration(_) | Self::Plan(_) | Self::Embedding(_) | Self::Retrieval(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Plan(_) => "plan",
            Self::Embedding(_) => "embedding",
            Self::Retrieval(_) => "retrieval",
        }
    }

    pub fn into_response(self) -> ErrorResponse {
        ErrorResponse { status: self.status(), message: self.to_string() }
    }
}

/// The only failure shape that leaves the search boundary: a status class
/// plus user-readable text. Serializes as `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
