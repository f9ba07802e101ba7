//! Operator-facing wording for dispatch outcomes and voice failures.

use client_core::{CommandError, DispatchOutcome, EndpointConfig, SettingsError};
use shared::domain::{ActivationSource, SignalValue};

use crate::controller::state::MessageKind;

pub const INVALID_URL_MESSAGE: &str =
    "Por favor, introduce una URL válida (ej. http://192.168.1.10:1880/plc-control)";
pub const SETTINGS_SAVED_MESSAGE: &str = "Configuración guardada con éxito.";
pub const LISTENING_STATUS: &str = "Escuchando... Di un número del 1 al 5.";
pub const LISTENING_FINISHED_STATUS: &str = "Escucha finalizada.";

/// What the operator sees after an event: an optional message, an optional new status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: Option<(String, MessageKind)>,
    pub status: Option<String>,
    pub prompt_config: bool,
}

impl Feedback {
    fn message(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            message: Some((text.into(), kind)),
            status: None,
            prompt_config: false,
        }
    }

    fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn status_only(status: impl Into<String>) -> Self {
        Self {
            message: None,
            status: Some(status.into()),
            prompt_config: false,
        }
    }
}

pub fn sending_status(value: SignalValue, source: ActivationSource) -> String {
    format!("Enviando valor {value} (Fuente: {source}) al PLC...")
}

pub fn outcome_feedback(
    outcome: &DispatchOutcome,
    value: i64,
    source: ActivationSource,
    endpoint: Option<&EndpointConfig>,
) -> Feedback {
    match outcome {
        DispatchOutcome::Success(signal) => Feedback::message(
            format!("✅ Señal enviada con éxito: {signal}"),
            MessageKind::Success,
        )
        .with_status(format!("Última señal enviada: {signal} (Fuente: {source})")),
        DispatchOutcome::ConfigMissing => Feedback {
            prompt_config: true,
            ..Feedback::message(
                "Error: La URL de la API del PLC no está configurada.",
                MessageKind::Error,
            )
        },
        DispatchOutcome::ValueOutOfRange(value) => Feedback::message(
            format!("Error: El valor {value} está fuera del rango permitido (1-5)."),
            MessageKind::Error,
        ),
        DispatchOutcome::ApiError { code, message } => Feedback::message(
            format!("❌ Error de API ({code}): {message}"),
            MessageKind::Error,
        )
        .with_status("Error en la respuesta de la API del PLC."),
        DispatchOutcome::TransportError { status, body } => {
            let body = if body.is_empty() {
                "Respuesta inesperada"
            } else {
                body.as_str()
            };
            Feedback::message(
                format!("❌ Error de Conexión ({status}): {body}"),
                MessageKind::Error,
            )
            .with_status(format!(
                "Error al enviar el valor {value}. Revisa el servidor del PLC."
            ))
        }
        DispatchOutcome::ConnectionFailure { .. } => {
            let url = endpoint.map(EndpointConfig::url).unwrap_or_default();
            Feedback::message(
                format!(
                    "⚠️ Error de conexión: No se pudo contactar a la API del PLC en {url}. Revisa la IP/puerto."
                ),
                MessageKind::Error,
            )
            .with_status("Error de conexión.")
        }
    }
}

pub fn recognized_feedback(transcript: &str, value: SignalValue) -> Feedback {
    Feedback::message(
        format!("Comando reconocido: \"{transcript}\". Enviando {value}."),
        MessageKind::Info,
    )
}

pub fn command_error_feedback(error: &CommandError) -> Feedback {
    match error {
        CommandError::Unrecognized { transcript } => Feedback::message(
            format!("No se reconoció un número válido (1-5) en: \"{transcript}\"."),
            MessageKind::Error,
        )
        .with_status(LISTENING_FINISHED_STATUS),
        CommandError::UnsupportedSpeechPlatform => Feedback::message(
            "⚠️ Esta plataforma no soporta la activación por voz.",
            MessageKind::Error,
        ),
        CommandError::Recognition(code) => Feedback::message(
            format!("Error de reconocimiento de voz: {code}"),
            MessageKind::Error,
        )
        .with_status("Error al escuchar."),
        CommandError::SessionActive => {
            Feedback::message("Ya hay una escucha de voz en curso.", MessageKind::Info)
        }
        CommandError::NoResult => Feedback::status_only(LISTENING_FINISHED_STATUS),
    }
}

pub fn settings_error_feedback(error: &SettingsError) -> Feedback {
    match error {
        SettingsError::InvalidEndpoint(_) => {
            Feedback::message(INVALID_URL_MESSAGE, MessageKind::Error)
        }
        other => Feedback::message(
            format!("Error: no se pudo guardar la configuración ({other})."),
            MessageKind::Error,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(raw: i64) -> SignalValue {
        SignalValue::new(raw).expect("signal")
    }

    #[test]
    fn success_sets_message_and_status() {
        let feedback = outcome_feedback(
            &DispatchOutcome::Success(signal(1)),
            1,
            ActivationSource::Voice,
            None,
        );
        assert_eq!(
            feedback.message,
            Some((
                "✅ Señal enviada con éxito: 1".to_string(),
                MessageKind::Success
            ))
        );
        assert_eq!(
            feedback.status.as_deref(),
            Some("Última señal enviada: 1 (Fuente: Voz)")
        );
    }

    #[test]
    fn transport_error_without_body_uses_placeholder() {
        let feedback = outcome_feedback(
            &DispatchOutcome::TransportError {
                status: 502,
                body: String::new(),
            },
            3,
            ActivationSource::Manual,
            None,
        );
        let (text, kind) = feedback.message.expect("message");
        assert_eq!(text, "❌ Error de Conexión (502): Respuesta inesperada");
        assert_eq!(kind, MessageKind::Error);
        assert_eq!(
            feedback.status.as_deref(),
            Some("Error al enviar el valor 3. Revisa el servidor del PLC.")
        );
    }

    #[test]
    fn config_missing_prompts_without_touching_status() {
        let feedback = outcome_feedback(
            &DispatchOutcome::ConfigMissing,
            2,
            ActivationSource::Random,
            None,
        );
        assert!(feedback.prompt_config);
        assert!(feedback.status.is_none());
    }

    #[test]
    fn out_of_range_names_the_value() {
        let feedback = outcome_feedback(
            &DispatchOutcome::ValueOutOfRange(8),
            8,
            ActivationSource::Manual,
            None,
        );
        assert_eq!(
            feedback.message.expect("message").0,
            "Error: El valor 8 está fuera del rango permitido (1-5)."
        );
        assert!(feedback.status.is_none());
    }

    #[test]
    fn sending_status_names_value_and_source() {
        assert_eq!(
            sending_status(signal(4), ActivationSource::Random),
            "Enviando valor 4 (Fuente: Aleatorio) al PLC..."
        );
    }

    #[test]
    fn ended_session_only_updates_status() {
        let feedback = command_error_feedback(&CommandError::NoResult);
        assert!(feedback.message.is_none());
        assert_eq!(feedback.status.as_deref(), Some(LISTENING_FINISHED_STATUS));
    }
}
