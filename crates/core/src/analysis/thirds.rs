/// Horizontal guide lines that split a photo into equal facial thirds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThirdLines {
    /// `floor(height / 3)`.
    pub third: u32,
    /// First line, at `third`.
    pub upper: u32,
    /// Second line, at `2 * third`.
    pub lower: u32,
}

impl ThirdLines {
    pub fn for_height(height: u32) -> Self {
        let third = height / 3;
        Self {
            third,
            upper: third,
            lower: 2 * third,
        }
    }
}
