// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Prompt presets offered in the prompt editor.

/// Built-in prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPreset {
    StrictCivil,
    SimpleGoal,
}

impl PromptPreset {
    pub const ALL: [PromptPreset; 2] = [PromptPreset::StrictCivil, PromptPreset::SimpleGoal];

    pub fn label(&self) -> &'static str {
        match self {
            PromptPreset::StrictCivil => "Strict civil engineering inpaint",
            PromptPreset::SimpleGoal => "Simple goal",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            PromptPreset::StrictCivil => STRICT_CIVIL,
            PromptPreset::SimpleGoal => SIMPLE_GOAL,
        }
    }
}

const STRICT_CIVIL: &str = "\
TASK
STRICT civil-engineering-grade IMAGE-TO-IMAGE INPAINT. NOT text-to-image.

INPUT
- Image 1 = BASE IMAGE (same size, framing and resolution)
- Image 2 = ENGINEERING REFERENCE (structural logic only, no pixel copying)

P0 ABSOLUTE
- ONLY edit inside the MASK (white editable)
- Outside MASK must remain pixel-perfect identical to Image 1
- Do NOT touch: people, signs/text, watermark, road texture outside mask

GOAL (inside mask only)
- Generate trench / shoring system as required
- Match original lighting, perspective, noise/grain, sharpness
- No white-line residue; mask boundary is a hard cut";

const SIMPLE_GOAL: &str = "\
Only modify inside the white mask; pixels outside the mask stay identical.
Goal: generate the specified trench/shoring structure inside the mask with correct \
perspective and matching light; do not alter people, text or watermarks.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_mention_mask() {
        for preset in PromptPreset::ALL {
            assert!(preset.text().contains("mask") || preset.text().contains("MASK"));
            assert!(!preset.label().is_empty());
        }
    }
}
