//! Handler adaptation for the dispatcher
//!
//! The dispatcher stores one handler shape for every command: a function
//! from a [`Request`] to a boxed future resolving to a JSON value or an
//! error. Command implementations are typed async functions; the adapter
//! here bridges the two once, generically, instead of per command.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::request::Request;
use crate::error::{ConnectorError, Result};

/// Uniform asynchronous outcome every registered handler produces.
pub type HandlerFuture = BoxFuture<'static, Result<Value>>;

/// Handler signature the dispatcher invokes for a matched command.
pub type CommandHandler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Adapt a typed asynchronous operation into the dispatcher handler shape.
///
/// A pure signature adapter: the resolved value is forwarded unchanged
/// (serialized for the dispatcher), and a failure propagates untouched for
/// the dispatcher to translate into a protocol-level error response. No
/// retry, no recovery, no timeout.
///
/// # Arguments
/// * `operation` - Typed command implementation
///
/// # Returns
/// * `CommandHandler` - Handler ready for registration
pub fn create_handler<T, F, Fut>(operation: F) -> CommandHandler
where
    T: Serialize + Send,
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move |request| {
        let outcome = operation(request);
        async move {
            let value = outcome.await?;
            serde_json::to_value(&value).map_err(|err| {
                ConnectorError::Generic(format!("unserializable command result: {err}"))
            })
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_success_value_is_forwarded() {
        let handler =
            create_handler(|_request| async { Ok(json!({"name": "people"})) });

        let value = handler(Request::new()).await.unwrap();
        assert_eq!(value, json!({"name": "people"}));
    }

    #[tokio::test]
    async fn test_typed_results_serialize() {
        #[derive(Serialize)]
        struct Named {
            name: String,
        }

        let handler = create_handler(|_request| async {
            Ok(vec![
                Named { name: "a".to_string() },
                Named { name: "b".to_string() },
            ])
        });

        let value = handler(Request::new()).await.unwrap();
        assert_eq!(value, json!([{"name": "a"}, {"name": "b"}]));
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let handler = create_handler(|_request| async {
            Err::<Value, _>(ConnectorError::Generic("boom".to_string()))
        });

        let err = handler(Request::new()).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Generic(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_handler_reads_the_request_it_is_given() {
        let handler = create_handler(|request: Request| async move {
            Ok(request.text("collectionName")?)
        });

        let request = Request::new().with_param("collectionName", "people");
        let value = handler(request).await.unwrap();
        assert_eq!(value, json!("people"));
    }
}
