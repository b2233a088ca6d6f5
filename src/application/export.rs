//! PDF export orchestration.
//!
//! Only one export runs at a time. While it runs, the preview is switched
//! to an export-friendly state; the original state is put back when the
//! export finishes, whether it succeeded or not.

use crate::domain::{render, ExportError, RenderedResume, ResumeDocument, TemplateConfig};
use crate::infrastructure::{ExportOptions, PdfRenderer};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

pub const EXPORT_FILE_NAME: &str = "resume.pdf";

/// Preview pane state the export temporarily overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewState {
    pub visible: bool,
    pub scroll: u16,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            visible: true,
            scroll: 0,
        }
    }
}

/// Holds the in-flight flag; clears it when dropped.
pub struct ExportTicket {
    in_flight: Rc<Cell<bool>>,
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.in_flight.set(false);
    }
}

/// Applies export overrides to the preview and restores the captured
/// original when dropped.
pub struct PreviewOverride<'a> {
    preview: &'a mut PreviewState,
    original: PreviewState,
}

impl<'a> PreviewOverride<'a> {
    pub fn apply(preview: &'a mut PreviewState) -> Self {
        let original = *preview;
        preview.visible = true;
        preview.scroll = 0;
        Self { preview, original }
    }

    pub fn state(&self) -> PreviewState {
        *self.preview
    }
}

impl Drop for PreviewOverride<'_> {
    fn drop(&mut self) {
        *self.preview = self.original;
    }
}

pub struct ExportController {
    in_flight: Rc<Cell<bool>>,
    settle: Duration,
    options: ExportOptions,
}

impl ExportController {
    pub fn new(settle: Duration, options: ExportOptions) -> Self {
        Self {
            in_flight: Rc::new(Cell::new(false)),
            settle,
            options,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Claims the single export slot.
    pub fn begin(&self) -> Result<ExportTicket, ExportError> {
        if self.in_flight.replace(true) {
            return Err(ExportError::InProgress);
        }
        Ok(ExportTicket {
            in_flight: Rc::clone(&self.in_flight),
        })
    }

    /// Renders `document` with `template` and writes `resume.pdf` into `dir`.
    ///
    /// `frame` is called once with the overridden preview state so the
    /// caller can draw the export view before the PDF is captured. The PDF
    /// is written next to the target and renamed into place, so a failed
    /// export keeps any earlier `resume.pdf` intact.
    pub fn export(
        &self,
        document: &ResumeDocument,
        template: &TemplateConfig,
        preview: &mut PreviewState,
        renderer: &dyn PdfRenderer,
        dir: &Path,
        frame: &mut dyn FnMut(&RenderedResume, PreviewState),
    ) -> Result<PathBuf, ExportError> {
        let _ticket = self.begin()?;
        let path = dir.join(EXPORT_FILE_NAME);
        let partial = dir.join(format!("{EXPORT_FILE_NAME}.tmp"));
        tracing::info!(path = %path.display(), template = %template.name, "export started");

        let rendered = render(document, template);
        let result = {
            let guard = PreviewOverride::apply(preview);
            frame(&rendered, guard.state());
            thread::sleep(self.settle);
            renderer
                .render(&rendered, &self.options, &partial)
                .and_then(|()| fs::rename(&partial, &path).map_err(ExportError::from))
        };

        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "export finished");
                Ok(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                if partial.exists() {
                    if let Err(rm) = fs::remove_file(&partial) {
                        tracing::warn!(error = %rm, "could not remove partial PDF");
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TemplateKind;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records what it was asked to render; optionally fails after writing a partial file.
    struct FakeRenderer {
        fail: bool,
        rendered: RefCell<Option<RenderedResume>>,
    }

    impl FakeRenderer {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                rendered: RefCell::new(None),
            }
        }
    }

    impl PdfRenderer for FakeRenderer {
        fn render(&self, resume: &RenderedResume, _options: &ExportOptions, path: &Path) -> Result<(), ExportError> {
            *self.rendered.borrow_mut() = Some(resume.clone());
            fs::write(path, b"%PDF-partial")?;
            if self.fail {
                Err(ExportError::Render("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn controller() -> ExportController {
        ExportController::new(Duration::ZERO, ExportOptions::default())
    }

    fn sample() -> ResumeDocument {
        ResumeDocument {
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_only_one_export_at_a_time() {
        let exports = controller();
        let ticket = exports.begin().unwrap();

        assert!(exports.is_in_flight());
        assert!(matches!(exports.begin(), Err(ExportError::InProgress)));

        drop(ticket);
        assert!(!exports.is_in_flight());
        assert!(exports.begin().is_ok());
    }

    #[test]
    fn test_export_rejected_while_in_flight() {
        let dir = TempDir::new().unwrap();
        let exports = controller();
        let _ticket = exports.begin().unwrap();
        let mut preview = PreviewState::default();

        let err = exports
            .export(
                &sample(),
                &TemplateConfig::builtin(TemplateKind::Classic),
                &mut preview,
                &FakeRenderer::new(false),
                dir.path(),
                &mut |_, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, ExportError::InProgress));
    }

    #[test]
    fn test_successful_export_restores_preview() {
        let dir = TempDir::new().unwrap();
        let exports = controller();
        let renderer = FakeRenderer::new(false);
        let mut preview = PreviewState {
            visible: false,
            scroll: 12,
        };

        let path = exports
            .export(
                &sample(),
                &TemplateConfig::builtin(TemplateKind::Modern),
                &mut preview,
                &renderer,
                dir.path(),
                &mut |_, _| {},
            )
            .unwrap();

        assert_eq!(path, dir.path().join("resume.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-partial");
        assert!(!dir.path().join("resume.pdf.tmp").exists());
        assert_eq!(preview, PreviewState { visible: false, scroll: 12 });
        assert!(!exports.is_in_flight());
        assert_eq!(renderer.rendered.borrow().as_ref().unwrap().template, "Modern");
    }

    #[test]
    fn test_failed_export_restores_state_and_removes_file() {
        let dir = TempDir::new().unwrap();
        let exports = controller();
        let mut preview = PreviewState {
            visible: false,
            scroll: 3,
        };

        let err = exports
            .export(
                &sample(),
                &TemplateConfig::builtin(TemplateKind::Classic),
                &mut preview,
                &FakeRenderer::new(true),
                dir.path(),
                &mut |_, _| {},
            )
            .unwrap_err();

        assert!(err.to_string().contains("boom"));
        assert_eq!(preview, PreviewState { visible: false, scroll: 3 });
        assert!(!dir.path().join("resume.pdf").exists());
        assert!(!dir.path().join("resume.pdf.tmp").exists());
        // The trigger is usable again
        assert!(exports.begin().is_ok());
    }

    #[test]
    fn test_preview_override_applies_and_restores() {
        let mut preview = PreviewState {
            visible: false,
            scroll: 9,
        };
        {
            let guard = PreviewOverride::apply(&mut preview);
            assert_eq!(guard.state(), PreviewState { visible: true, scroll: 0 });
        }
        assert_eq!(preview, PreviewState { visible: false, scroll: 9 });
    }

    #[test]
    fn test_failed_export_keeps_previous_pdf() {
        let dir = TempDir::new().unwrap();
        let previous = dir.path().join("resume.pdf");
        fs::write(&previous, b"old").unwrap();
        let mut preview = PreviewState::default();

        let result = controller().export(
            &sample(),
            &TemplateConfig::builtin(TemplateKind::Classic),
            &mut preview,
            &FakeRenderer::new(true),
            dir.path(),
            &mut |_, _| {},
        );

        assert!(result.is_err());
        assert_eq!(fs::read(&previous).unwrap(), b"old");
        assert!(!dir.path().join("resume.pdf.tmp").exists());
    }

    #[test]
    fn test_frame_sees_override_before_capture() {
        let dir = TempDir::new().unwrap();
        let renderer = FakeRenderer::new(false);
        let mut preview = PreviewState {
            visible: false,
            scroll: 12,
        };
        let mut frames = Vec::new();

        controller()
            .export(
                &sample(),
                &TemplateConfig::builtin(TemplateKind::Classic),
                &mut preview,
                &renderer,
                dir.path(),
                &mut |resume, state| {
                    assert!(renderer.rendered.borrow().is_none(), "frame drawn after capture");
                    frames.push((resume.template.clone(), state));
                },
            )
            .unwrap();

        assert_eq!(
            frames,
            vec![("Classic".to_string(), PreviewState { visible: true, scroll: 0 })]
        );
        assert_eq!(preview, PreviewState { visible: false, scroll: 12 });
    }
}
