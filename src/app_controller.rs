use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::downloader::SubtitleDownloader;
use crate::file_utils::FileManager;
use crate::jobs::JobManager;
use crate::sources::SubtitleCandidate;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{
    translate_entries, PipelineOptions, TranslationOutcome, TranslationService,
};

// @module: Application controller for subtitle workflows

/// Main application controller for subtitle search, download and translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Run registry
    jobs: Arc<JobManager>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            jobs: Arc::new(JobManager::new()),
        })
    }

    /// The controller's job registry, for cancellation wiring
    pub fn jobs(&self) -> Arc<JobManager> {
        Arc::clone(&self.jobs)
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Translate a single SRT file into the output directory.
    ///
    /// Produces `<stem>.<target_lang>.srt`; refuses to clobber an
    /// existing translation unless `force_overwrite` is set.
    pub async fn translate_file(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(output_dir)?;

        let output_path =
            FileManager::generate_output_path(input_file, output_dir, &self.config.target_language);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        let document = SubtitleDocument::from_srt_file(input_file)?;
        if document.is_empty() {
            return Err(anyhow!(
                "No subtitle entries found in {:?}",
                input_file
            ));
        }

        info!(
            "Translating {} entries: {} -> {} ({} preset)",
            document.len(),
            self.config.source_language,
            self.config.target_language,
            self.config.speed
        );

        let outcome = self.run_translation(&document).await?;
        self.save_outcome(outcome, &output_path)?;

        Ok(())
    }

    /// Translate every .srt file under a directory
    pub async fn translate_dir(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        let files = FileManager::find_srt_files(input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No .srt files found under {:?}", input_dir));
        }

        info!("Found {} subtitle file(s) to translate", files.len());

        for file in &files {
            if let Err(e) = self.translate_file(file, output_dir, force_overwrite).await {
                warn!("Skipping {:?}: {}", file, e);
            }
        }

        Ok(())
    }

    /// Search every catalog for a movie and return ranked candidates
    pub async fn search(&self, movie_name: &str) -> Result<Vec<SubtitleCandidate>> {
        let downloader = SubtitleDownloader::new(&self.config.download);
        downloader
            .search(movie_name, &self.config.source_language)
            .await
    }

    /// Find, download and translate subtitles for a movie name.
    ///
    /// `pick` selects a candidate from the ranked list; with None the
    /// top-ranked candidate wins.
    pub async fn search_and_translate(
        &self,
        movie_name: &str,
        output_dir: &Path,
        pick: Option<usize>,
    ) -> Result<PathBuf> {
        let downloader = SubtitleDownloader::new(&self.config.download);

        info!("Searching subtitles for '{}'", movie_name);
        let candidates = downloader
            .search(movie_name, &self.config.source_language)
            .await?;

        let chosen = match pick {
            Some(n) => candidates
                .get(n)
                .ok_or_else(|| anyhow!("Pick {} out of range (0..{})", n, candidates.len()))?,
            None => &candidates[0],
        };

        info!(
            "Selected '{}' from {} ({} downloads, rating {})",
            chosen.title, chosen.source, chosen.downloads, chosen.rating
        );

        let content = downloader
            .download(chosen)
            .await
            .context("Failed to download the selected subtitle")?;

        if !FileManager::looks_like_srt(&content) {
            return Err(anyhow!(
                "Downloaded payload from {} does not look like SRT content",
                chosen.source
            ));
        }

        let document = SubtitleDocument::from_entries(SubtitleDocument::parse(&content));
        if document.is_empty() {
            return Err(anyhow!("Downloaded subtitle parsed to zero entries"));
        }

        FileManager::ensure_dir(output_dir)?;
        let output_path = FileManager::generate_search_output_path(
            output_dir,
            movie_name,
            &self.config.target_language,
        );

        let outcome = self.run_translation(&document).await?;
        self.save_outcome(outcome, &output_path)?;

        Ok(output_path)
    }

    /// Run the pipeline over a document as a tracked job with a progress
    /// bar. Ctrl-c cancellation is wired to the job's token.
    async fn run_translation(&self, document: &SubtitleDocument) -> Result<TranslationOutcome> {
        let job = self.jobs.create_job();

        let service = match TranslationService::new(&self.config.translation) {
            Ok(service) => service,
            Err(e) => {
                job.fail(e.to_string());
                return Err(e.into());
            }
        };

        job.start();

        let progress_bar = Self::build_progress_bar(document.len() as u64);
        let bar = progress_bar.clone();
        let progress_job = job.clone();

        let outcome = translate_entries(
            &document.entries,
            &service,
            &self.config.source_language,
            &self.config.target_language,
            PipelineOptions::from(self.config.speed),
            &job.cancellation_token(),
            move |completed, total| {
                bar.set_position(completed as u64);
                progress_job.set_progress(completed, total);
            },
        )
        .await;

        progress_bar.finish_and_clear();
        job.finish(outcome.status);

        Ok(outcome)
    }

    /// Write the result and its failure log, reporting how the run ended
    fn save_outcome(&self, outcome: TranslationOutcome, output_path: &Path) -> Result<()> {
        let translated_count = outcome.entries.len() - outcome.failures.len();

        if !outcome.failures.is_empty() {
            let log_path = output_path.with_extension("failures.log");
            for failure in &outcome.failures {
                FileManager::append_to_log_file(
                    &log_path,
                    &format!(
                        "entry {} (position {}): {}",
                        failure.index, failure.position, failure.message
                    ),
                )?;
            }
            warn!(
                "{} entries kept their original text; details in {:?}",
                outcome.failures.len(),
                log_path
            );
        }

        let document = SubtitleDocument::from_entries(outcome.entries);
        document.write_to_srt(output_path)?;

        if outcome.status == crate::translation::RunStatus::Cancelled {
            warn!(
                "Cancelled: partial translation saved to {:?}",
                output_path
            );
        } else {
            info!(
                "Translation completed: {} entries saved to {:?}",
                translated_count, output_path
            );
        }

        Ok(())
    }

    fn build_progress_bar(total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }
}
