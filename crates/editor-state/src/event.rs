use editor_core::errors::EditorResult;
use editor_core::hex::floor_to;
use editor_core::overlay::span;

/// Editing intents, already decoded from whatever key or menu produced
/// them. Commands that need typed arguments (goto, search, fill, open,
/// export) are called directly instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ForwardChar,
    BackwardChar,
    NextLine,
    PreviousLine,
    ForwardBlock,
    BackwardBlock,
    NextLines,
    PreviousLines,
    BeginningOfLine,
    EndOfLine,
    PageForward,
    PageBackward,
    BeginningOfBuffer,
    EndOfBuffer,
    Recenter,
    InsertChar(u8),
    DeleteBackwardChar,
    DeleteBackwardBlock,
    TogglePane,
    SetMark,
    CopyRegion,
    Yank,
    Truncate,
    DiscardEdits,
    Save,
    SaveAndQuit,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseKind {
    Press,
    Drag,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Action(Action),
    /// `row` and `col` are relative to the first data line.
    Mouse {
        kind: MouseKind,
        row: usize,
        col: usize,
    },
    Resize(crate::layout::TerminalSize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl crate::EditorState {
    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Whatever the triggered command reports. The session stays usable;
    /// the caller shows the message and keeps going.
    pub fn handle(&mut self, event: Event) -> EditorResult<Flow> {
        match event {
            Event::Action(action) => return self.apply(action),
            Event::Mouse { kind, row, col } => self.mouse(kind, row, col),
            Event::Resize(size) => self.resize(size)?,
        }

        Ok(Flow::Continue)
    }

    fn apply(&mut self, action: Action) -> EditorResult<Flow> {
        tracing::trace!(?action, "apply");

        match action {
            Action::ForwardChar => self.forward_char(),
            Action::BackwardChar => self.backward_char(),
            Action::NextLine => self.next_line(),
            Action::PreviousLine => self.previous_line(),
            Action::ForwardBlock => self.forward_block(),
            Action::BackwardBlock => self.backward_block(),
            Action::NextLines => self.next_lines(),
            Action::PreviousLines => self.previous_lines(),
            Action::BeginningOfLine => self.beginning_of_line(),
            Action::EndOfLine => self.end_of_line(),
            Action::PageForward => self.page_forward(),
            Action::PageBackward => self.page_backward(),
            Action::BeginningOfBuffer => self.beginning_of_buffer(),
            Action::EndOfBuffer => self.end_of_buffer(),
            Action::Recenter => self.recenter(),
            Action::InsertChar(c) => {
                self.insert_char(c)?;
            }
            Action::DeleteBackwardChar => self.delete_backward_char(),
            Action::DeleteBackwardBlock => self.delete_backward_block(),
            Action::TogglePane => self.toggle_pane(),
            Action::SetMark => self.set_mark(),
            Action::CopyRegion => self.copy_region(false)?,
            Action::Yank => self.yank()?,
            Action::Truncate => self.truncate_here()?,
            Action::DiscardEdits => self.discard_edits(),
            Action::Save => self.save()?,
            Action::SaveAndQuit => {
                if self.has_pending_edits() {
                    self.save()?;
                }

                return Ok(Flow::Quit);
            }
            Action::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Refits the layout to a new terminal size, keeping the cursor on the
    /// same byte.
    ///
    /// # Errors
    ///
    /// `EditorError::WindowTooSmall`; the previous layout stays then.
    pub fn resize(&mut self, size: crate::layout::TerminalSize) -> EditorResult<()> {
        let layout = Self::fit_for(&self.store, &self.config, size)?;
        let pos = self.position();

        self.terminal = size;
        self.layout = layout;
        self.viewport.resize(layout.page());
        self.cursor = 0;

        let grid = match self.config.mode {
            editor_core::enums::DisplayMode::BySector => layout.page(),
            editor_core::enums::DisplayMode::Maximized => layout.line_length(),
        };

        if !self.set_base(floor_to(pos, span(grid))) {
            tracing::debug!(pos, "resize could not realign the window");
        }

        if !self.relocate(pos) {
            tracing::debug!(pos, now = self.position(), "resize could not restore the cursor");
        }

        Ok(())
    }

    /// Places the cursor under a click, and spans the selection from the
    /// press point while dragging. Clicks past the data are ignored.
    pub fn mouse(&mut self, kind: MouseKind, row: usize, col: usize) {
        let Some((index, pane, nibble)) = self.layout.hit_test(row, col) else {
            return;
        };

        if index > self.viewport.valid_count() {
            return;
        }

        self.cursor = index;
        self.pane = pane;
        self.nibble = nibble;

        let pos = self.position();

        match kind {
            MouseKind::Press => {
                self.viewport.unmark_all();
                self.selection.clear();
                self.drag_start = Some(pos);
            }
            MouseKind::Drag => {
                if let Some(start) = self.drag_start {
                    let file_size = self.file_size();

                    self.viewport.unmark_all();
                    self.selection.select_between(start, pos);
                    self.selection.clamp_to(file_size);

                    if self.selection.is_set() {
                        self.viewport
                            .mark_region(self.base, self.selection.min(), self.selection.max());
                    }
                }
            }
            MouseKind::Release => self.drag_start = None,
        }
    }
}
