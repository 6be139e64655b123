//! Take-once bookkeeping for a load attempt's browser-owned resources.

/// The script tag and runtime instance handle owned by one load attempt.
///
/// Both the restart path and unload run teardown over the same storage;
/// `take_for_teardown` yields each resource at most once, so the runtime can
/// never be quit twice and the script tag never removed twice.
#[derive(Debug, Default)]
pub struct AttemptHandles<S, I> {
    script: Option<S>,
    instance: Option<I>,
}

impl<S, I> AttemptHandles<S, I> {
    pub fn new() -> Self {
        Self { script: None, instance: None }
    }

    pub fn set_script(&mut self, script: S) {
        self.script = Some(script);
    }

    pub fn set_instance(&mut self, instance: I) {
        self.instance = Some(instance);
    }

    /// Yield whatever is held for teardown; later calls get nothing.
    pub fn take_for_teardown(&mut self) -> (Option<S>, Option<I>) {
        (self.script.take(), self.instance.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_yields_each_resource_once() {
        let mut handles: AttemptHandles<&str, &str> = AttemptHandles::new();
        handles.set_script("tag");
        handles.set_instance("runtime");

        let (script, instance) = handles.take_for_teardown();
        assert_eq!(script, Some("tag"));
        assert_eq!(instance, Some("runtime"));

        let (script, instance) = handles.take_for_teardown();
        assert!(script.is_none());
        assert!(instance.is_none());
    }

    #[test]
    fn restart_then_unload_quits_instance_once() {
        let mut handles: AttemptHandles<&str, &str> = AttemptHandles::new();
        handles.set_script("tag");
        handles.set_instance("runtime");

        // Restart tears down, then unload runs over the same storage.
        let mut quits = 0;
        for _ in 0..2 {
            let (_, instance) = handles.take_for_teardown();
            if instance.is_some() {
                quits += 1;
            }
        }
        assert_eq!(quits, 1);
    }

    #[test]
    fn teardown_before_any_attempt_is_a_no_op() {
        let mut handles: AttemptHandles<&str, &str> = AttemptHandles::new();
        let (script, instance) = handles.take_for_teardown();
        assert!(script.is_none());
        assert!(instance.is_none());
    }
}
