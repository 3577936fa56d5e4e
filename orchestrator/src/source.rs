//! Reads queries as whitespace separated `start end steps func_id` tuples.

use std::{collections::VecDeque, io, str::FromStr};

use comms::specs::Query;
use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};

use crate::configs::InvalidPolicy;

const PROMPT: &str = "Query: [start] [end] [numSteps] [funcId]\n";

/// Supplies one query per round until end of stream.
///
/// A token that fails to parse, or running out of input, ends the stream.
/// A parsable but invalid query is handled according to the `InvalidPolicy`.
pub struct QuerySource<R> {
    reader: R,
    tokens: VecDeque<String>,
    policy: InvalidPolicy,
    prompt: bool,
}

impl<R: AsyncBufRead + Unpin> QuerySource<R> {
    /// Creates a new `QuerySource` with prompting disabled.
    ///
    /// # Arguments
    /// * `reader` - Where the textual queries are read from.
    /// * `policy` - What to do with invalid queries.
    pub fn new(reader: R, policy: InvalidPolicy) -> Self {
        Self {
            reader,
            tokens: VecDeque::new(),
            policy,
            prompt: false,
        }
    }

    /// Prints the query prompt to stdout before every read.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Reads the next valid query.
    ///
    /// # Returns
    /// `Some(query)`, or `None` once the stream ended.
    ///
    /// # Errors
    /// Returns the underlying `io::Error` if reading failed.
    pub async fn next(&mut self) -> io::Result<Option<Query>> {
        loop {
            if self.prompt {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(PROMPT.as_bytes()).await?;
                stdout.flush().await?;
            }

            let Some((start, end, steps, func_id)) = self.read_tuple().await? else {
                return Ok(None);
            };

            match Query::from_parts(start, end, steps, func_id) {
                Ok(query) => {
                    debug!("read query {query:?}");
                    return Ok(Some(query));
                }
                Err(e) => match self.policy {
                    InvalidPolicy::Stop => {
                        warn!("invalid query, ending intake: {e}");
                        return Ok(None);
                    }
                    InvalidPolicy::Skip => warn!("skipping invalid query: {e}"),
                },
            }
        }
    }

    async fn read_tuple(&mut self) -> io::Result<Option<(f64, f64, u64, u64)>> {
        let Some(start) = self.next_parsed::<f64>().await? else {
            return Ok(None);
        };
        let Some(end) = self.next_parsed::<f64>().await? else {
            return Ok(None);
        };
        let Some(steps) = self.next_parsed::<u64>().await? else {
            return Ok(None);
        };
        let Some(func_id) = self.next_parsed::<u64>().await? else {
            return Ok(None);
        };

        Ok(Some((start, end, steps, func_id)))
    }

    async fn next_parsed<T: FromStr>(&mut self) -> io::Result<Option<T>> {
        let Some(token) = self.next_token().await? else {
            debug!("end of input");
            return Ok(None);
        };

        match token.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!("unparsable token {token:?}, ending intake");
                Ok(None)
            }
        }
    }

    async fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            self.tokens.extend(line.split_whitespace().map(str::to_owned));
        }

        Ok(self.tokens.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use comms::specs::FuncId;

    use super::*;

    async fn collect(input: &str, policy: InvalidPolicy) -> Vec<Query> {
        let mut source = QuerySource::new(input.as_bytes(), policy);
        let mut queries = Vec::new();
        while let Some(query) = source.next().await.unwrap() {
            queries.push(query);
        }
        queries
    }

    #[tokio::test]
    async fn reads_one_query_per_tuple() {
        let queries = collect("0 1 100 0\n-10 10 1000 1\n", InvalidPolicy::Stop).await;

        assert_eq!(
            queries,
            vec![
                Query::new(0.0, 1.0, 100, FuncId::Sine).unwrap(),
                Query::new(-10.0, 10.0, 1000, FuncId::Gaussian).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn fields_may_span_lines() {
        let queries = collect("0.5\n  2.5 10\n\n2\n", InvalidPolicy::Stop).await;
        assert_eq!(
            queries,
            vec![Query::new(0.5, 2.5, 10, FuncId::ChargeDecay).unwrap()]
        );
    }

    #[tokio::test]
    async fn unparsable_token_ends_stream() {
        let queries = collect("0 1 100 0\nquit\n0 1 100 0\n", InvalidPolicy::Skip).await;
        assert_eq!(queries.len(), 1);
    }

    #[tokio::test]
    async fn truncated_tuple_ends_stream() {
        let queries = collect("0 1 100", InvalidPolicy::Stop).await;
        assert!(queries.is_empty());
    }

    #[tokio::test]
    async fn invalid_query_stops_by_default() {
        let queries = collect("0 1 0 0\n0 1 100 0\n", InvalidPolicy::Stop).await;
        assert!(queries.is_empty());
    }

    #[tokio::test]
    async fn invalid_queries_can_be_skipped() {
        let input = "0 1 0 0\n5 1 10 0\n0 1 10 7\n0 1 10 1\n";
        let queries = collect(input, InvalidPolicy::Skip).await;

        assert_eq!(
            queries,
            vec![Query::new(0.0, 1.0, 10, FuncId::Gaussian).unwrap()]
        );
    }

    #[tokio::test]
    async fn negative_steps_end_stream() {
        let queries = collect("0 1 -5 0\n", InvalidPolicy::Skip).await;
        assert!(queries.is_empty());
    }
}
