#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::error::FeedError;
    use crate::output::{self, ColorMode, OutputSink};
    use crate::reassembler::LineReassembler;
    use crate::selector::SelectionPattern;
    use crate::types::{LogLine, Source, StreamRequest};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_deployment() {
        let args = vec!["kubectl-feed", "web"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.deployment, "web");
        assert!(!cli.follow);
        assert!(cli.tail.is_none());
        assert!(cli.container.is_none());
        assert_eq!(cli.color, ColorMode::Auto);
    }

    #[test]
    fn test_cli_requires_deployment() {
        let args = vec!["kubectl-feed"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_tail_zero_is_set() {
        let args = vec!["kubectl-feed", "web", "--tail", "0", "-f"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.tail, Some(0));
        assert!(cli.follow);
    }

    #[test]
    fn test_cli_rejects_negative_tail() {
        let args = vec!["kubectl-feed", "web", "--tail=-3"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_empty_container_is_set() {
        let args = vec!["kubectl-feed", "web", "-c", ""];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.container, Some(String::new()));
    }

    #[test]
    fn test_cli_parsing_namespace_and_context() {
        let args = vec!["kubectl-feed", "web", "-n", "prod", "--context", "east"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.namespace, Some("prod".to_string()));
        assert_eq!(cli.context, Some("east".to_string()));
    }

    #[test]
    fn test_cli_parsing_color() {
        let args = vec!["kubectl-feed", "web", "--color", "never"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.color, ColorMode::Never);
    }

    #[test]
    fn test_stream_request_to_log_params() {
        let args = vec!["kubectl-feed", "web", "-c", "sidecar", "--tail", "10", "-f"];
        let cli = Cli::try_parse_from(args).unwrap();
        let request = cli.stream_request();
        assert_eq!(
            request,
            StreamRequest {
                follow: true,
                tail_lines: Some(10),
                container: Some("sidecar".to_string()),
            }
        );

        let params = request.to_log_params();
        assert!(params.follow);
        assert_eq!(params.tail_lines, Some(10));
        assert_eq!(params.container, Some("sidecar".to_string()));
        assert!(!params.timestamps);
    }

    #[test]
    fn test_default_stream_request_leaves_options_unset() {
        let params = StreamRequest::default().to_log_params();
        assert!(!params.follow);
        assert_eq!(params.tail_lines, None);
        assert_eq!(params.container, None);
    }

    #[test]
    fn test_pattern_matches_generated_pod_names() {
        let pattern = SelectionPattern::for_deployment("web").unwrap();
        assert!(pattern.matches("web-7f3a1c-x9k2p"));
        assert!(pattern.matches("web-7f3a1c-m4n8q"));
        assert!(pattern.matches("web-abc-def"));
    }

    #[test]
    fn test_pattern_is_only_anchored_at_start() {
        let pattern = SelectionPattern::for_deployment("web").unwrap();
        assert!(pattern.matches("web-7f3a1c-x9k2p-extra"));
        assert!(!pattern.matches("frontend-web-7f3a1c-x9k2p"));
    }

    #[test]
    fn test_pattern_rejects_other_shapes() {
        let pattern = SelectionPattern::for_deployment("web").unwrap();
        assert!(!pattern.matches("web"));
        assert!(!pattern.matches("web-7f3a1c"));
        assert!(!pattern.matches("web-xyz-abc"));
        assert!(!pattern.matches("web-7F3A1C-x9k2p"));
        assert!(!pattern.matches("web-7f3a1c-X9K2P"));
        assert!(!pattern.matches("webapp-7f3a1c-x9k2p"));
        assert!(!pattern.matches("other-9b2e-z1a2"));
    }

    #[test]
    fn test_select_keeps_discovery_order() {
        let pattern = SelectionPattern::for_deployment("web").unwrap();
        let sources = ["web-7f3a1c-x9k2p", "other-9b2e-z1a2", "web-7f3a1c-m4n8q", "web"]
            .into_iter()
            .map(|name| Source {
                name: name.to_string(),
                containers: vec!["app".to_string()],
            })
            .collect();
        let selected: Vec<String> = pattern
            .select(sources)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(selected, vec!["web-7f3a1c-x9k2p", "web-7f3a1c-m4n8q"]);
    }

    #[test]
    fn test_invalid_deployment_name_is_rejected() {
        let err = SelectionPattern::for_deployment("web(").unwrap_err();
        match err {
            FeedError::InvalidPattern { deployment, .. } => assert_eq!(deployment, "web("),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_reassembler_joins_split_line() {
        let mut lines = LineReassembler::new();
        assert!(lines.push(b"hello wo").is_empty());
        assert_eq!(lines.pending_len(), 8);
        assert_eq!(lines.push(b"rld\n"), vec!["hello world".to_string()]);
        assert_eq!(lines.pending_len(), 0);
    }

    #[test]
    fn test_reassembler_output_independent_of_chunking() {
        let content = b"alpha\nbeta\n\ngamma\ndelta";
        let expected = vec!["alpha", "beta", "", "gamma"];

        for first in 0..=content.len() {
            for second in first..=content.len() {
                let mut lines = LineReassembler::new();
                let mut out = Vec::new();
                out.extend(lines.push(&content[..first]));
                out.extend(lines.push(&content[first..second]));
                out.extend(lines.push(&content[second..]));
                assert_eq!(out, expected, "split at {} and {}", first, second);
                assert_eq!(lines.pending_len(), "delta".len());
            }
        }
    }

    #[test]
    fn test_reassembler_keeps_multibyte_characters_split_across_reads() {
        let bytes = "héllo\n".as_bytes();
        let mut lines = LineReassembler::new();
        assert!(lines.push(&bytes[..2]).is_empty());
        assert_eq!(lines.push(&bytes[2..]), vec!["héllo".to_string()]);
    }

    #[test]
    fn test_format_line_without_color() {
        let line = LogLine {
            source: "web-7f3a1c-x9k2p".to_string(),
            text: "GET /healthz 200".to_string(),
        };
        assert_eq!(
            output::format_line(&line, false),
            "web-7f3a1c-x9k2p | GET /healthz 200"
        );
    }

    #[test]
    fn test_format_line_with_color() {
        let line = LogLine {
            source: "web-7f3a1c-x9k2p".to_string(),
            text: "ready".to_string(),
        };
        let rendered = output::format_line(&line, true);
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(rendered.contains("\u{1b}["));
        }
        assert!(rendered.contains("web-7f3a1c-x9k2p |"));
        assert!(rendered.ends_with(" ready"));
    }

    #[test]
    fn test_color_is_stable_per_pod() {
        assert_eq!(
            output::get_color("web-7f3a1c-x9k2p"),
            output::get_color("web-7f3a1c-x9k2p")
        );
    }

    #[test]
    fn test_color_mode() {
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
    }

    #[test]
    fn test_sink_writes_one_line_per_entry() {
        let mut buf = Vec::new();
        {
            let mut sink = OutputSink::new(&mut buf, false);
            for (source, text) in [("web-1a-b", "one"), ("web-1a-c", "two")] {
                sink.write_line(&LogLine {
                    source: source.to_string(),
                    text: text.to_string(),
                })
                .unwrap();
            }
        }
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "web-1a-b | one\nweb-1a-c | two\n"
        );
    }
}
