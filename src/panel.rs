use crate::host::TextFields;
use clap::ValueEnum;

/// Dimension a text field edits
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldKind {
    Width,
    Height,
    Depth,
    Scale,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Width => "Width",
            FieldKind::Height => "Height",
            FieldKind::Depth => "Depth",
            FieldKind::Scale => "Scale",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextInput {
    pub kind: FieldKind,
    pub text: String,
}

/// The bound text fields and which one has keyboard focus
#[derive(Clone, Debug, Default)]
pub struct FieldPanel {
    inputs: Vec<TextInput>,
    focus: usize,
}

impl FieldPanel {
    /// One field per kind, in the order given; duplicates are ignored
    pub fn new(fields: impl IntoIterator<Item = (FieldKind, String)>) -> Self {
        let mut inputs: Vec<TextInput> = Vec::new();
        for (kind, text) in fields {
            if inputs.iter().all(|input| input.kind != kind) {
                inputs.push(TextInput { kind, text });
            }
        }
        FieldPanel { inputs, focus: 0 }
    }

    pub fn inputs(&self) -> &[TextInput] {
        &self.inputs
    }

    pub fn focused(&self) -> Option<FieldKind> {
        self.inputs.get(self.focus).map(|input| input.kind)
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    pub fn insert(&mut self, c: char) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.text.pop();
        }
    }

    pub fn clear_focused(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.text.clear();
        }
    }

    /// Replaces the text of a bound field; unbound kinds are ignored
    pub fn set_text(&mut self, kind: FieldKind, text: impl Into<String>) {
        if let Some(input) = self.inputs.iter_mut().find(|input| input.kind == kind) {
            input.text = text.into();
        }
    }

    pub fn text(&self, kind: FieldKind) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.kind == kind)
            .map(|input| input.text.as_str())
    }

    /// Current text of every bound field
    pub fn text_fields(&self) -> TextFields<'_> {
        TextFields {
            width: self.text(FieldKind::Width),
            height: self.text(FieldKind::Height),
            depth: self.text(FieldKind::Depth),
            scale: self.text(FieldKind::Scale),
        }
    }
}
