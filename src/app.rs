use crate::body;
use crate::cli::Args;
use crate::config::Config;
use crate::error::Result;
use crate::event::TriggerEvent;
use crate::github::{GhCli, PullRequestHost};
use crate::jira;
use crate::output::{self, ActionOutputs};

/// Activity types the link is kept in sync for
const EXPECTED_ACTIONS: [&str; 3] = ["opened", "edited", "reopened"];

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub ticket: Option<String>,
    pub link: Option<String>,
    pub body_updated: bool,
}

/// Main application entry point
pub fn run(args: Args) -> Result<RunReport> {
    let config = Config::from_args(&args)?;
    let event = TriggerEvent::load(
        args.event_name.as_deref(),
        args.event_path.as_deref(),
        args.repository.as_deref(),
    )?;

    let host = GhCli::new(config.token.clone()).with_server_url(args.server_url.as_deref());
    let outputs = ActionOutputs::new(args.output_file);

    sync_link(&config, &event, &host, &outputs)
}

/// Fetch the pull request, reconcile its description and write it back if
/// anything changed
pub fn sync_link<H: PullRequestHost>(
    config: &Config,
    event: &TriggerEvent,
    host: &H,
    outputs: &ActionOutputs,
) -> Result<RunReport> {
    if let Some(action) = event.action.as_deref() {
        if !EXPECTED_ACTIONS.contains(&action) {
            output::warning(&format!(
                "Running for pull request activity {:?}; expected one of {}",
                action,
                EXPECTED_ACTIONS.join(", ")
            ));
        }
    }

    output::info(&format!("Pull request {}#{}", event.repository, event.number));
    let pr = host.fetch_pull_request(&event.repository, event.number)?;
    output::value("PR title", &pr.title);

    let ticket = jira::extract_ticket(&pr.title, &config.patterns);
    let link = ticket
        .as_deref()
        .map(|ticket| jira::format_link(&config.jira_base_url, ticket));

    match (&ticket, &link) {
        (Some(ticket), Some(link)) => {
            output::value("Jira ticket", ticket);
            output::value("Jira link", link);
        }
        _ => output::info("No Jira ticket found in the PR title"),
    }

    let result = body::reconcile(&pr.body, link.as_deref(), config.placement, &config.patterns);

    let body_updated = if !result.changed {
        output::info("PR description is already up to date");
        false
    } else if config.dry_run {
        output::info("Dry run, PR description would become:");
        println!("{}", result.body);
        false
    } else {
        host.update_body(&event.repository, event.number, &result.body)?;
        output::info("PR description updated");
        true
    };

    if let (Some(ticket), Some(link)) = (&ticket, &link) {
        outputs.set("jira-ticket", ticket)?;
        outputs.set("jira-link", link)?;
    }
    outputs.set("body-updated", &body_updated.to_string())?;

    Ok(RunReport {
        ticket,
        link,
        body_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use tempfile::NamedTempFile;

    use crate::body::LinkPlacement;
    use crate::error::Error;
    use crate::github::PullRequest;

    struct FakeHost {
        pr: PullRequest,
        updates: RefCell<Vec<(String, u64, String)>>,
    }

    impl FakeHost {
        fn new(title: &str, body: &str) -> Self {
            Self {
                pr: PullRequest {
                    number: 7,
                    title: title.into(),
                    body: body.into(),
                },
                updates: RefCell::new(vec![]),
            }
        }
    }

    impl PullRequestHost for FakeHost {
        fn fetch_pull_request(&self, _repository: &str, number: u64) -> Result<PullRequest> {
            assert_eq!(number, self.pr.number);
            Ok(self.pr.clone())
        }

        fn update_body(&self, repository: &str, number: u64, body: &str) -> Result<()> {
            self.updates
                .borrow_mut()
                .push((repository.into(), number, body.into()));
            Ok(())
        }
    }

    struct FailingHost;

    impl PullRequestHost for FailingHost {
        fn fetch_pull_request(&self, _repository: &str, _number: u64) -> Result<PullRequest> {
            Err(Error::GitHubCli("HTTP 401: Bad credentials".into()))
        }

        fn update_body(&self, _repository: &str, _number: u64, _body: &str) -> Result<()> {
            panic!("update_body must not be called");
        }
    }

    fn config(placement: LinkPlacement, dry_run: bool) -> Config {
        Config {
            token: "t".into(),
            jira_base_url: "https://jira.example.com".into(),
            placement,
            patterns: jira::build_patterns(None).unwrap(),
            dry_run,
        }
    }

    fn event() -> TriggerEvent {
        TriggerEvent {
            name: "pull_request".into(),
            action: Some("edited".into()),
            repository: "acme/widgets".into(),
            number: 7,
        }
    }

    fn outputs() -> (NamedTempFile, ActionOutputs) {
        let file = NamedTempFile::new().unwrap();
        let outputs = ActionOutputs::new(Some(file.path().to_path_buf()));
        (file, outputs)
    }

    #[test]
    fn test_inserts_link_and_sets_outputs() {
        let host = FakeHost::new("feat(PROJ-123): add X", "Fixes bug");
        let (file, outputs) = outputs();

        let report = sync_link(&config(LinkPlacement::BodyStart, false), &event(), &host, &outputs)
            .unwrap();

        let link = "🔗 Linked to JIRA ticket: [PROJ-123](https://jira.example.com/browse/PROJ-123)";
        assert_eq!(report.ticket.as_deref(), Some("PROJ-123"));
        assert_eq!(report.link.as_deref(), Some(link));
        assert!(report.body_updated);

        let updates = host.updates.borrow();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "acme/widgets");
        assert_eq!(updates[0].1, 7);
        assert_eq!(updates[0].2, format!("{}\n\nFixes bug", link));

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            contents,
            format!("jira-ticket=PROJ-123\njira-link={}\nbody-updated=true\n", link)
        );
    }

    #[test]
    fn test_no_write_when_unchanged() {
        let link = "🔗 Linked to JIRA ticket: [PROJ-123](https://jira.example.com/browse/PROJ-123)";
        let host = FakeHost::new("PROJ-123 add X", &format!("Fixes bug\n\n{}", link));
        let (_file, outputs) = outputs();

        let report = sync_link(&config(LinkPlacement::BodyEnd, false), &event(), &host, &outputs)
            .unwrap();

        assert!(!report.body_updated);
        assert!(host.updates.borrow().is_empty());
    }

    #[test]
    fn test_removes_stale_link_without_ticket() {
        let host = FakeHost::new(
            "fix typo",
            "🔗 Linked to JIRA ticket: [OLD-1](https://jira.example.com/browse/OLD-1)\n\nFixes bug",
        );
        let (file, outputs) = outputs();

        let report = sync_link(&config(LinkPlacement::BodyStart, false), &event(), &host, &outputs)
            .unwrap();

        assert_eq!(report.ticket, None);
        assert!(report.body_updated);
        assert_eq!(host.updates.borrow()[0].2, "Fixes bug");

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "body-updated=true\n");
    }

    #[test]
    fn test_no_ticket_and_no_link_is_noop() {
        let host = FakeHost::new("fix typo", "");
        let (_file, outputs) = outputs();

        let report = sync_link(&config(LinkPlacement::BodyStart, false), &event(), &host, &outputs)
            .unwrap();

        assert_eq!(
            report,
            RunReport {
                ticket: None,
                link: None,
                body_updated: false,
            }
        );
        assert!(host.updates.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_never_writes() {
        let host = FakeHost::new("PROJ-9 thing", "Body");
        let (_file, outputs) = outputs();

        let report = sync_link(&config(LinkPlacement::BodyStart, true), &event(), &host, &outputs)
            .unwrap();

        assert_eq!(report.ticket.as_deref(), Some("PROJ-9"));
        assert!(!report.body_updated);
        assert!(host.updates.borrow().is_empty());
    }

    #[test]
    fn test_host_error_is_propagated() {
        let (_file, outputs) = outputs();
        let err = sync_link(
            &config(LinkPlacement::BodyStart, false),
            &event(),
            &FailingHost,
            &outputs,
        )
        .unwrap_err();
        assert!(matches!(err, Error::GitHubCli(_)));
    }

    #[test]
    fn test_run_rejects_wrong_event_before_network() {
        let args = Args {
            github_token: Some("t".into()),
            jira_base_url: Some("https://jira.example.com".into()),
            event_name: Some("push".into()),
            ..Args::default()
        };
        assert!(matches!(run(args), Err(Error::Event(_))));
    }

    #[test]
    fn test_run_rejects_bad_config_before_event() {
        let args = Args {
            github_token: Some("t".into()),
            jira_base_url: Some("https://jira.example.com".into()),
            link_placement: Some("body-middle".into()),
            event_name: Some("push".into()),
            ..Args::default()
        };
        assert!(matches!(run(args), Err(Error::Config(_))));
    }
}
