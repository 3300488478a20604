use crate::extract::Extract;
use crate::metrics::{Metric, NOT_AVAILABLE};
use crate::source::PageSource;
use crate::Result;
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, trace};

/// Infinity glyph the page uses for unbounded ratios.
const INFINITY_GLYPH: &str = "\u{221e}";

/// Retrieve the page for `symbol` once and extract every metric from it, in list order.
///
/// Failing to retrieve the page is an error; failing to find a single metric is not, and
/// yields [`NOT_AVAILABLE`] in that metric's slot. Parsing and extraction run on the blocking
/// pool, so a panicking extractor surfaces as [`Error::Join`](crate::Error::Join).
pub async fn fetch(
    symbol: &str,
    metrics: &Arc<[Metric]>,
    source: &dyn PageSource,
    extractor: &Arc<dyn Extract>,
) -> Result<Vec<String>> {
    let page = source.page(symbol).await?;
    trace!("page retrieved for [{symbol}], {} bytes", page.len());

    let symbol = symbol.to_string();
    let metrics = metrics.clone();
    let extractor = extractor.clone();
    let values = tokio::task::spawn_blocking(move || {
        collect(&symbol, &page, &metrics, extractor.as_ref())
    })
    .await?;
    Ok(values)
}

/// Extract every metric from an already retrieved page, in list order.
pub fn collect(
    symbol: &str,
    page: &str,
    metrics: &[Metric],
    extractor: &dyn Extract,
) -> Vec<String> {
    let page = Html::parse_document(page);
    metrics
        .iter()
        .map(|metric| match extractor.extract(&page, metric) {
            Some(value) => normalize(value),
            None => {
                debug!("failed to collect ({}) for ({symbol})", metric.name);
                NOT_AVAILABLE.to_string()
            }
        })
        .collect()
}

/// A full row of [`NOT_AVAILABLE`], for symbols whose page could not be retrieved.
pub fn unavailable(width: usize) -> Vec<String> {
    vec![NOT_AVAILABLE.to_string(); width]
}

/// Rewrite the infinity glyph to `"Infinity"`; any other value passes through.
pub fn normalize(value: String) -> String {
    if value == INFINITY_GLYPH {
        "Infinity".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LabelCell;
    use crate::metrics::build;
    use crate::Error;
    use async_trait::async_trait;
    use scraper::Html;

    struct OnePage(&'static str);

    #[async_trait]
    impl PageSource for OnePage {
        async fn page(&self, symbol: &str) -> Result<String> {
            match symbol {
                "AAA" => Ok(self.0.to_string()),
                _ => Err(Error::Io(std::io::ErrorKind::NotFound.into())),
            }
        }
    }

    const PAGE: &str = r#"<table>
        <tr><td><span>Beta (5Y Monthly)</span></td><td>1.2</td></tr>
        <tr><td><span>PEG Ratio (5 yr expected)</span></td><td>∞</td></tr>
    </table>"#;

    #[test]
    fn infinity_is_normalized() {
        assert_eq!(normalize("\u{221e}".into()), "Infinity");
        assert_eq!(normalize("1.2".into()), "1.2");
        assert_eq!(normalize("-\u{221e}".into()), "-\u{221e}");
    }

    struct Exploding;

    impl Extract for Exploding {
        fn extract(&self, _: &Html, metric: &Metric) -> Option<String> {
            panic!("cannot extract {}", metric.name);
        }
    }

    fn setup(names: &[&str]) -> (Arc<[Metric]>, Arc<dyn Extract>) {
        let metrics: Arc<[Metric]> = build(names, &[] as &[&str]).into();
        let extractor = LabelCell::new(&metrics).unwrap();
        (metrics, Arc::new(extractor))
    }

    #[tokio::test]
    async fn values_follow_metric_order() {
        let (metrics, extractor) = setup(&["PEG Ratio", "Market Cap", "Beta"]);

        let values = fetch("AAA", &metrics, &OnePage(PAGE), &extractor)
            .await
            .unwrap();
        assert_eq!(values, vec!["Infinity", "N/A", "1.2"]);
    }

    #[tokio::test]
    async fn missing_page_is_an_error() {
        let (metrics, extractor) = setup(&["Beta"]);

        let result = fetch("BBB", &metrics, &OnePage(PAGE), &extractor).await;
        assert!(result.is_err());
        assert_eq!(unavailable(metrics.len()), vec!["N/A"]);
    }

    #[tokio::test]
    async fn extractor_panic_is_an_error() {
        let (metrics, _) = setup(&["Beta"]);
        let extractor: Arc<dyn Extract> = Arc::new(Exploding);

        let result = fetch("AAA", &metrics, &OnePage(PAGE), &extractor).await;
        assert!(matches!(result, Err(Error::Join(_))));
    }
}
