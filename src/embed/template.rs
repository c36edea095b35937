//! Templates with typed placeholder substitution.

use std::marker::PhantomData;

/// A set of values substituted into an embedded template.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Embedded text whose placeholders are filled by `V`.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting<'a>(&'a str);

    impl TemplateVars for Greeting<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__NAME__", self.0)
        }
    }

    #[test]
    fn test_render_substitutes() {
        const HELLO: Template<Greeting<'static>> = Template::new("hello __NAME__, __NAME__");
        assert_eq!(HELLO.render(&Greeting("ana")), "hello ana, ana");
    }
}
