use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

//bounded command ring with per-item epochs
//full buffer keeps the freshest data: the oldest item is discarded
pub struct RingBuffer<T>{
    items: Mutex<VecDeque<(T, u64)>>,
    write_epoch: AtomicU64, //incremented on every push
    capacity: usize,
}

impl<T: Clone> RingBuffer<T>{
    //creating a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Self{
        assert!(capacity > 0, "Capacity must be greater than 0");

        RingBuffer{
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            write_epoch: AtomicU64::new(0),
            capacity,
        }
    }

    //push item to buffer
    //return the epoch num. of the push
    pub fn push(&self, item: T) -> u64{
        let epoch = self.write_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let mut items = self.items.lock().unwrap();
        if items.len() == self.capacity{
            //buffer is full, discard oldest (freshness bias)
            items.pop_front();
        }
        items.push_back((item, epoch));

        epoch
    }

    //pop the oldest item from buffer
    pub fn pop(&self) -> Option<T>{
        let mut items = self.items.lock().unwrap();
        items.pop_front().map(|(item, _)| item)
    }

    //peek at latest item without removing (for subscribers)
    pub fn peek_latest(&self) -> Option<(T, u64)>{
        let items = self.items.lock().unwrap();
        items.back().cloned()
    }

    //get the latest epoch (for freshness detection)
    pub fn latest_epoch(&self) -> u64{
        self.write_epoch.load(Ordering::SeqCst)
    }

    //get the current occupancy
    pub fn len(&self) -> usize{
        self.items.lock().unwrap().len()
    }

    //check emptyness
    pub fn is_empty(&self) -> bool{
        self.items.lock().unwrap().is_empty()
    }

    //check fullness
    pub fn is_full(&self) -> bool{
        self.items.lock().unwrap().len() == self.capacity
    }

    //return capacity
    pub fn capacity(&self) -> usize{
        self.capacity
    }
}

//Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_fifo() {
        let rb: RingBuffer<i32> = RingBuffer::new(5);

        rb.push(10);
        rb.push(20);
        rb.push(30);

        assert_eq!(rb.pop(), Some(10));
        assert_eq!(rb.pop(), Some(20));
        assert_eq!(rb.pop(), Some(30));
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn test_epoch_increment() {
        let rb: RingBuffer<i32> = RingBuffer::new(5);

        let e1 = rb.push(10);
        let e2 = rb.push(20);

        assert_eq!(e1, 1);
        assert_eq!(e2, 2);
        assert_eq!(rb.latest_epoch(), 2);
    }

    #[test]
    fn test_overflow_discards_old() {
        let rb: RingBuffer<i32> = RingBuffer::new(3);

        rb.push(1);
        rb.push(2);
        rb.push(3);  //buffer full: [1, 2, 3]

        assert!(rb.is_full());
        assert_eq!(rb.len(), 3);

        rb.push(4);  //overflow -> discard 1: [2, 3, 4]

        assert_eq!(rb.pop(), Some(2));  //1 was discarded
        assert_eq!(rb.pop(), Some(3));
        assert_eq!(rb.pop(), Some(4));
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn test_full_capacity_usable() {
        let rb: RingBuffer<i32> = RingBuffer::new(3);

        rb.push(1);
        rb.push(2);
        rb.push(3);

        //all 3 slots used
        assert_eq!(rb.len(), 3);
        assert!(rb.is_full());
        assert!(!rb.is_empty());
    }

    #[test]
    fn test_peek_latest() {
        let rb: RingBuffer<i32> = RingBuffer::new(5);

        rb.push(10);
        rb.push(20);
        rb.push(30);

        //peek doesn't consume
        let (val, epoch) = rb.peek_latest().unwrap();
        assert_eq!(val, 30);
        assert_eq!(epoch, 3);

        //still 3 items
        assert_eq!(rb.len(), 3);
    }

    #[test]
    fn test_shared_push_pop() {
        use std::sync::Arc;
        use std::thread;

        let rb: Arc<RingBuffer<i32>> = Arc::new(RingBuffer::new(64));
        let writer = Arc::clone(&rb);

        thread::spawn(move ||{
            for i in 0..32{
                writer.push(i);
            }
        }).join().unwrap();

        let mut received = Vec::new();
        while let Some(val) = rb.pop(){
            received.push(val);
        }
        assert_eq!(received.len(), 32);
        for i in 1..received.len(){
            assert!(received[i] > received[i - 1]);
        }
    }
}
