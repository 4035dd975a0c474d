//! Built-in module content.
//!
//! One entry per identifier the built-in rule table can activate, plus a
//! few general modules that projects pull in through `additional`.

pub(crate) const BUILTIN_MODULES: &[(&str, &str)] = &[
    (
        "git",
        "## Git\n\n\
         - Keep commits small and focused on one change.\n\
         - Write the subject line in the imperative mood, under 72 characters.\n\
         - Never commit secrets, build output, or local editor files.",
    ),
    (
        "rust",
        "## Rust\n\n\
         - Build with `cargo build`, test with `cargo test`.\n\
         - Run `cargo fmt` and `cargo clippy -- -D warnings` before committing.\n\
         - Propagate errors with `?`; avoid `unwrap()` outside tests.",
    ),
    (
        "node",
        "## Node.js\n\n\
         - Install dependencies with the lockfile's package manager.\n\
         - Run scripts through `package.json` rather than global tools.\n\
         - Keep the lockfile committed and in sync with `package.json`.",
    ),
    (
        "typescript",
        "## TypeScript\n\n\
         - Keep `strict` enabled in `tsconfig.json`.\n\
         - Prefer explicit types on exported functions.\n\
         - Type-check with `tsc --noEmit` before committing.",
    ),
    (
        "react",
        "## React\n\n\
         - Use function components and hooks.\n\
         - Keep components small; lift state only as far as needed.\n\
         - Give list items stable `key` props.",
    ),
    (
        "python",
        "## Python\n\n\
         - Work inside a virtual environment.\n\
         - Pin dependencies in `pyproject.toml` or `requirements.txt`.\n\
         - Format and lint before committing; add type hints to public functions.",
    ),
    (
        "go",
        "## Go\n\n\
         - Run `go fmt ./...` and `go vet ./...` before committing.\n\
         - Test with `go test ./...`.\n\
         - Return errors, wrap them with `%w`, and handle them at the call site.",
    ),
    (
        "java",
        "## Java\n\n\
         - Build and test through the project wrapper (`./mvnw` or `./gradlew`).\n\
         - Keep dependency versions in the build file, not on the command line.",
    ),
    (
        "ruby",
        "## Ruby\n\n\
         - Install gems with `bundle install`; run tools with `bundle exec`.\n\
         - Keep `Gemfile.lock` committed.",
    ),
    (
        "docker",
        "## Docker\n\n\
         - Pin base image versions.\n\
         - Use multi-stage builds to keep runtime images small.\n\
         - Keep a `.dockerignore` next to the `Dockerfile`.",
    ),
    (
        "kubernetes",
        "## Kubernetes\n\n\
         - Set resource requests and limits on every container.\n\
         - Define readiness and liveness probes.\n\
         - Keep secrets out of manifests.",
    ),
    (
        "terraform",
        "## Terraform\n\n\
         - Run `terraform fmt` and `terraform validate` before committing.\n\
         - Review `terraform plan` output before every apply.\n\
         - Keep state remote and locked.",
    ),
    (
        "ci",
        "## Continuous Integration\n\n\
         - Every change must pass the pipeline before merge.\n\
         - Reproduce pipeline failures locally before pushing fixes.",
    ),
    (
        "make",
        "## Make\n\n\
         - Use the Makefile targets as the entry points for build, test, and lint.\n\
         - Check `make help` or the Makefile before inventing new commands.",
    ),
    (
        "testing",
        "## Testing\n\n\
         - Add or update tests with every behavior change.\n\
         - Run the full suite before committing.\n\
         - A bug fix starts with a failing test.",
    ),
    (
        "commits",
        "## Commit Messages\n\n\
         - Format: `<type>(<scope>): <subject>`.\n\
         - Types: feat, fix, docs, refactor, test, chore.\n\
         - Explain what and why in the body, not how.",
    ),
    (
        "security",
        "## Security\n\n\
         - Validate all external input.\n\
         - Never log credentials or tokens.\n\
         - Keep dependencies patched.",
    ),
];
