use crate::RenderArgs;
use crate::finder::Page;

/// Resolve a single URL path and print the rendered HTML to stdout.
pub fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    let (_config, _base_path, finder, base) = super::setup(args.config_file.as_deref())?;

    let mut context = base;
    context.insert("path", &args.path);

    match finder.resolve(&args.path, &context)? {
        Page::Rendered(html) => {
            println!("{}", html);
            Ok(())
        }
        Page::Redirect(location) => {
            anyhow::bail!("{} redirects to {}", args.path, location)
        }
    }
}
