//! Reference implementation of [`ServerInterface`].

use apigroup::{CallContext, Status, Version};
use async_trait::async_trait;
use tracing::debug;

use crate::internal::{
    ComputeDoubleRequest, ComputeDoubleResponse, PoemForm, ServerInterface, TellMeAPoemRequest,
    TellMeAPoemResponse,
};

const HAIKU_TITLE: &str = "Versions";
const HAIKU: &[&str] = &[
    "an old field renamed",
    "the new client asks, the old",
    "answers all the same",
];

const COUPLET_TITLE: &str = "Compatibility";
const COUPLET: &[&str] = &[
    "The wire may change its shape from year to year,",
    "the meaning underneath stays sitting here.",
];

/// The service the CLI exposes: doubles numbers and recites short poems.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyService;

impl DummyService {
    /// Creates the service. It holds no state.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServerInterface for DummyService {
    async fn compute_double(
        &self,
        ctx: &CallContext,
        request: ComputeDoubleRequest,
        version: Version,
    ) -> Result<ComputeDoubleResponse, Status> {
        debug!(call_id = %ctx.call_id(), %version, input = %request.input, "compute double");
        Ok(ComputeDoubleResponse {
            value: request.input.doubled(),
        })
    }

    async fn tell_me_a_poem(
        &self,
        ctx: &CallContext,
        request: TellMeAPoemRequest,
        version: Version,
    ) -> Result<TellMeAPoemResponse, Status> {
        debug!(call_id = %ctx.call_id(), %version, form = ?request.form, "tell me a poem");
        let (title, lines): (&str, &[&str]) = match request.form {
            PoemForm::Any | PoemForm::Haiku => (HAIKU_TITLE, HAIKU),
            PoemForm::Couplet => (COUPLET_TITLE, COUPLET),
        };
        Ok(TellMeAPoemResponse {
            title: request.want_title.then(|| title.to_string()),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::Operand;

    const V1: Version = Version::from_static("v1");

    #[tokio::test]
    async fn doubles_the_operand() {
        let request = ComputeDoubleRequest {
            input: Operand::new(-21).unwrap(),
        };
        let response = DummyService
            .compute_double(&CallContext::new(), request, V1)
            .await
            .unwrap();
        assert_eq!(response.value, -42);
    }

    #[tokio::test]
    async fn title_only_when_asked() {
        let service = DummyService::new();
        let untitled = service
            .tell_me_a_poem(
                &CallContext::new(),
                TellMeAPoemRequest {
                    want_title: false,
                    form: PoemForm::Couplet,
                },
                V1,
            )
            .await
            .unwrap();
        assert_eq!(untitled.title, None);
        assert_eq!(untitled.lines.len(), 2);

        let titled = service
            .tell_me_a_poem(
                &CallContext::new(),
                TellMeAPoemRequest {
                    want_title: true,
                    form: PoemForm::Any,
                },
                V1,
            )
            .await
            .unwrap();
        assert_eq!(titled.title.as_deref(), Some(HAIKU_TITLE));
        assert_eq!(titled.lines.len(), 3);
    }
}
