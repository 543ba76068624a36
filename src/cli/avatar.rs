//! CLI handler for avatar generation.

use anyhow::Result;

use crate::avatar::{create_avatar, GeneratedAvatar};
use crate::cli::args::AvatarCliArgs;

pub fn handle_avatar_command(args: AvatarCliArgs) -> Result<()> {
    println!("{}", render(args));
    Ok(())
}

fn render(args: AvatarCliArgs) -> String {
    if args.html {
        let mut avatar = GeneratedAvatar::new(args.seed, args.variant);
        if let Some(class) = args.class {
            avatar = avatar.with_class(class);
        }
        avatar.render().to_html()
    } else {
        create_avatar(args.variant, &args.seed).into_svg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::AvatarVariant;

    fn args(html: bool) -> AvatarCliArgs {
        AvatarCliArgs {
            seed: "Ada Lovelace".to_string(),
            variant: AvatarVariant::Initials,
            html,
            class: Some("rounded".to_string()),
        }
    }

    #[test]
    fn test_render_svg() {
        let output = render(args(false));
        assert!(output.starts_with("<svg"));
        assert!(output.contains(">AL</text>"));
    }

    #[test]
    fn test_render_html() {
        let output = render(args(true));
        assert!(output.contains(r#"class="rounded""#));
        assert!(output.contains(r#"alt="Avatar""#));
        assert!(output.contains(">A</span>"));
    }
}
