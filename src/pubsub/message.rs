pub trait Message: Clone + Send + 'static{}

//blanket impl for all types that meet constraints
impl<T: Clone + Send + 'static> Message for T{}

#[cfg(test)]
mod tests{
    use super::*;

    #[derive(Clone)]
    struct TestCmd{
        value: f64,
    }

    #[test]
    fn test_message_trait_impl(){
        fn accepts_message<T: Message>(_: T){}

        accepts_message(0i32);
        accepts_message(0.0f64);
        accepts_message(true);
        accepts_message(());
        accepts_message(TestCmd{ value: 1.0 });
    }
}
