use crate::archiver::Archiver;
use crate::command::Runner;
use crate::destination::{self, Destination};
use crate::error::Error;
use crate::page_range::{compile_ranges, validate_cut_points};
use crate::pdf::pdftk::{self, Pdftk};
use crate::settings::Settings;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// One split run, as collected from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Absolute path of the PDF to split
    pub source: PathBuf,
    /// Pages to split after, ascending
    pub pages: Vec<u32>,
    pub destination: Destination,
    pub archive: bool,
}

/// The pdftk commands for a run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub destdir: PathBuf,
    pub commands: Vec<String>,
}

pub struct Splitter<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
    archiver: Box<dyn Archiver>,
}

impl<'a> Splitter<'a> {
    pub fn new(
        settings: &'a Settings,
        runner: &'a dyn Runner,
        archiver: Box<dyn Archiver>,
    ) -> Self {
        Splitter {
            settings,
            runner,
            archiver,
        }
    }

    /// Check for pdftk, then work out every command the run will issue.
    pub fn plan(&self, options: &Options) -> Result<Plan> {
        let pdftk = Pdftk::new(self.runner);
        if !pdftk.is_present()? {
            return Err(Error::ToolNotPresent.into());
        }

        let destdir = destination::resolve(&options.destination, self.settings)?;
        let total_pages = pdftk.page_count(&options.source)?;
        let pages = validate_cut_points(&options.pages, total_pages)?;

        let commands = compile_ranges(&pages)
            .iter()
            .map(|range| pdftk::cat_command(&options.source, range, &destdir))
            .collect();

        Ok(Plan { destdir, commands })
    }

    /// Split the source, stopping at the first pdftk failure, then archive it if asked.
    pub async fn run(&self, options: &Options) -> Result<Plan> {
        let plan = self.plan(options)?;

        let pdftk = Pdftk::new(self.runner);
        for command in &plan.commands {
            pdftk.run(command)?;
        }

        if options.archive {
            self.archive(&options.source).await;
        }

        Ok(plan)
    }

    async fn archive(&self, source: &Path) {
        tracing::debug!(archiver = self.archiver.name(), source = %source.display(), "archiving");
        if let Err(e) = self.archiver.archive(source).await {
            tracing::warn!(archiver = self.archiver.name(), "archiving failed: {:#}", e);
            eprintln!("Warning: the split succeeded but archiving failed: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archiver::NullArchiver;
    use crate::command::testing::RecordingRunner;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    const DUMP_10_PAGES: &str = "PdfID0: 1a2b\nNumberOfPages: 10\n";

    #[derive(Clone, Default)]
    struct RecordingArchiver {
        archived: Arc<Mutex<Vec<PathBuf>>>,
    }

    #[async_trait]
    impl Archiver for RecordingArchiver {
        async fn archive(&self, source: &Path) -> Result<()> {
            self.archived.lock().unwrap().push(source.to_path_buf());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingArchiver;

    #[async_trait]
    impl Archiver for FailingArchiver {
        async fn archive(&self, _source: &Path) -> Result<()> {
            anyhow::bail!("bucket unreachable")
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn options(destination: Destination) -> Options {
        Options {
            source: PathBuf::from("/test/source.pdf"),
            pages: vec![1, 3, 4, 8],
            destination,
            archive: false,
        }
    }

    fn split_calls(runner: &RecordingRunner) -> Vec<String> {
        runner
            .calls()
            .into_iter()
            .filter(|call| call.contains(" cat "))
            .collect()
    }

    fn expected_commands(destdir: &str) -> Vec<String> {
        ["1", "2-3", "4", "5-8", "9-10"]
            .iter()
            .map(|range| {
                format!(
                    "pdftk /test/source.pdf cat {} output {}/source_{}.pdf",
                    range, destdir, range
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_split_into_destdir() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let splitter = Splitter::new(&settings, &runner, Box::new(NullArchiver));

        splitter
            .run(&options(Destination::Dir(PathBuf::from("/test/destdir"))))
            .await
            .unwrap();

        assert_eq!(split_calls(&runner), expected_commands("/test/destdir"));
        assert_eq!(runner.calls()[0], "which pdftk");
    }

    #[tokio::test]
    async fn test_split_into_cloudfile() {
        let cloud = tempfile::tempdir().unwrap();
        let settings = Settings {
            cloudfile: Some(cloud.path().display().to_string()),
            ..Default::default()
        };
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let splitter = Splitter::new(&settings, &runner, Box::new(NullArchiver));

        let plan = splitter.run(&options(Destination::Cloudfile)).await.unwrap();

        assert_eq!(plan.destdir, cloud.path());
        assert_eq!(
            split_calls(&runner),
            expected_commands(&cloud.path().display().to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_pdftk_stops_everything() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().fail_on("which");
        let splitter = Splitter::new(&settings, &runner, Box::new(NullArchiver));

        let err = splitter
            .run(&options(Destination::CurrentDir))
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ToolNotPresent)));
        assert_eq!(runner.calls(), vec!["which pdftk"]);
    }

    #[tokio::test]
    async fn test_unconfigured_cloudfile_issues_no_split_commands() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let splitter = Splitter::new(&settings, &runner, Box::new(NullArchiver));

        let err = splitter
            .run(&options(Destination::Cloudfile))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::CloudDirectoryNotConfigured)
        ));
        assert!(split_calls(&runner).is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_pages_issue_no_split_commands() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let splitter = Splitter::new(&settings, &runner, Box::new(NullArchiver));

        let mut opts = options(Destination::Dir(PathBuf::from("/test/destdir")));
        opts.pages = vec![3, 12];
        let err = splitter.run(&opts).await.unwrap_err();

        assert_eq!(err.downcast_ref::<Error>().map(Error::exit_code), Some(76));
        assert!(split_calls(&runner).is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_halts_run() {
        let settings = Settings::default();
        let runner = RecordingRunner::new()
            .respond("pdftk /test/source.pdf dump_data", DUMP_10_PAGES)
            .fail_on("pdftk /test/source.pdf cat 4 ");
        let archiver = RecordingArchiver::default();
        let splitter = Splitter::new(&settings, &runner, Box::new(archiver.clone()));

        let mut opts = options(Destination::Dir(PathBuf::from("/test/destdir")));
        opts.archive = true;
        let err = splitter.run(&opts).await.unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::CommandExecutionFailed { command, .. }) => assert_eq!(
                command,
                "pdftk /test/source.pdf cat 4 output /test/destdir/source_4.pdf"
            ),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(split_calls(&runner).len(), 3);
        assert!(archiver.archived.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archives_after_success() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let archiver = RecordingArchiver::default();
        let splitter = Splitter::new(&settings, &runner, Box::new(archiver.clone()));

        let mut opts = options(Destination::Dir(PathBuf::from("/test/destdir")));
        opts.archive = true;
        splitter.run(&opts).await.unwrap();

        assert_eq!(
            *archiver.archived.lock().unwrap(),
            vec![PathBuf::from("/test/source.pdf")]
        );
    }

    #[tokio::test]
    async fn test_no_archive_unless_requested() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let archiver = RecordingArchiver::default();
        let splitter = Splitter::new(&settings, &runner, Box::new(archiver.clone()));

        splitter
            .run(&options(Destination::Dir(PathBuf::from("/test/destdir"))))
            .await
            .unwrap();

        assert!(archiver.archived.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_keeps_run_successful() {
        let settings = Settings::default();
        let runner = RecordingRunner::new().respond("pdftk", DUMP_10_PAGES);
        let splitter = Splitter::new(&settings, &runner, Box::new(FailingArchiver));

        let mut opts = options(Destination::Dir(PathBuf::from("/test/destdir")));
        opts.archive = true;
        let plan = splitter.run(&opts).await.unwrap();

        assert_eq!(plan.commands, expected_commands("/test/destdir"));
        assert_eq!(split_calls(&runner), expected_commands("/test/destdir"));
    }
}
