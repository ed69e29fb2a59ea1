use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThinnizatorError {
    #[error("[thinnizator] scene rejected {operation} on {node}: {source}")]
    Scene {
        operation: &'static str,
        node: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("[thinnizator] no world matrix for {0}")]
    MissingWorldMatrix(String),

    #[error("[thinnizator] instance buffer holds {len} floats, expected {expected}")]
    BufferLength { len: usize, expected: usize },
}

impl ThinnizatorError {
    pub(crate) fn scene<E>(operation: &'static str, node: impl Into<String>) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let node = node.into();
        move |source| Self::Scene {
            operation,
            node,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThinnizatorError>;
