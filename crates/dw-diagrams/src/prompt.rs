//! Instruction template sent with every flowchart.

/// Fixed instructions asking the model to turn a flowchart SVG into the D2
/// subset understood by [`DiagramGraph::parse`](crate::DiagramGraph::parse).
pub const RECOVERY_PROMPT: &str = r#"# Convert an SVG flowchart into D2

You will receive the SVG markup of a rendered flowchart. Rebuild its structure
as plain D2 source.

## Nodes
- Every `<g class="node">` element is one node. Ignore cluster/group boxes.
- The node's text lives in `<foreignObject>` (or `<text>`) elements inside it.
- Declare each node on one line: `NodeName: all of its text on a single line`
- Node names: no spaces, use camelCase or underscores.
- Do not use containers `{}`, markdown labels `|md`, shapes, sizes, or `\n`.

## Edges
- Edge paths live under `<g class="edgePaths">`.
- Path ids encode their endpoints: `L_Menu_Configs_0` means `Menu -> Configs`.
- Write one edge per line: `Source -> Target`

## Output
Reply with a single ```d2 code block containing, in this order:
1. all node declarations
2. the comment line `# Connections`
3. all edges

```d2
Menu: F::Menu ImGui Interface
Configs: Configuration storage

# Connections
Menu -> Configs
```

Keep it minimal; anything beyond this syntax breaks the text rendering.

Convert this SVG flowchart:"#;

/// Build the user message for one fragment.
#[must_use]
pub fn user_message(svg: &str) -> String {
    format!("{RECOVERY_PROMPT}\n\n```svg\n{svg}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_wraps_svg_after_prompt() {
        let message = user_message("<svg/>");

        assert!(message.starts_with(RECOVERY_PROMPT));
        assert!(message.ends_with("\n\n```svg\n<svg/>\n```"));
    }
}
