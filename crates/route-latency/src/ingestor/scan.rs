use crate::ingestor::{
    query::LogQuery,
    source::LogSource,
    types::{Page, Record},
};
use anyhow::Result;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

enum ScanState {
    Start,
    Scrolling(String),
    Done,
}

/// Lazily stream every record matching `query`.
///
/// Pages are requested one at a time, only when the previous page has been
/// consumed. The stream ends on the first empty page, after which the cursor is
/// cleared. Any backend error is yielded once and ends the stream.
pub fn scan<'a, S>(source: &'a S, query: &'a LogQuery) -> impl Stream<Item = Result<Record>> + 'a
where
    S: LogSource + Sync + ?Sized,
{
    stream::try_unfold(ScanState::Start, move |state| async move {
        let Page { scroll_id, hits } = match state {
            ScanState::Start => source.open(query).await?,
            ScanState::Scrolling(id) => source.scroll(&id).await?,
            ScanState::Done => return Ok(None),
        };

        if hits.is_empty() {
            if let Some(id) = scroll_id {
                source.clear(&id).await?;
            }
            return Ok(None);
        }

        debug!("Fetched page of {} records", hits.len());
        let next = match scroll_id {
            Some(id) => ScanState::Scrolling(id),
            None => ScanState::Done,
        };
        Ok::<_, anyhow::Error>(Some((
            stream::iter(hits.into_iter().map(Ok::<_, anyhow::Error>)),
            next,
        )))
    })
    .try_flatten()
}
