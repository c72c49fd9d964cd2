//! Block context tracking
//!
//! The converter keeps exactly two slots of block state instead of a stack:
//! the active container ("big block") and the active leaf block ("small
//! element"). Nested lists or quotes collapse onto the most recently opened
//! container; closing any container returns to no container at all.

/// Active container element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BigBlock {
    #[default]
    None,
    UnorderedList,
    OrderedList,
    Blockquote,
    Pre,
}

impl BigBlock {
    /// Container established by opening `name`, if any
    pub fn for_tag(name: &str) -> Option<Self> {
        match name {
            "ul" => Some(BigBlock::UnorderedList),
            "ol" => Some(BigBlock::OrderedList),
            "blockquote" => Some(BigBlock::Blockquote),
            "pre" => Some(BigBlock::Pre),
            _ => None,
        }
    }
}

/// Active leaf block element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallElement {
    #[default]
    None,
    Paragraph,
    Heading,
    ListItem,
}

/// Two-slot block state for one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockContext {
    pub big: BigBlock,
    /// Innermost open leaf block
    ///
    /// Kept in step with open and close tags for callers inspecting the
    /// state; separation is decided by the container slot alone.
    pub small: SmallElement,
}

impl BlockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a container, replacing any previous container and leaf state
    pub fn open_big(&mut self, big: BigBlock) {
        self.big = big;
        self.small = SmallElement::None;
    }

    /// Enter a leaf block
    pub fn open_small(&mut self, small: SmallElement) {
        self.small = small;
    }

    /// Leave the current block; containers also reset the container slot
    pub fn close(&mut self, big_block: bool) {
        self.small = SmallElement::None;
        if big_block {
            self.big = BigBlock::None;
        }
    }

    pub fn in_blockquote(&self) -> bool {
        self.big == BigBlock::Blockquote
    }
}
