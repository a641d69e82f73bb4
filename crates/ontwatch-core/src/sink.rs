use crate::record::Record;

/// Receiver for records as a cycle produces them.
///
/// Records arrive one at a time in step order, as soon as each step has
/// decoded them; nothing is buffered until the end of the cycle.
pub trait MetricsSink {
    fn emit(&mut self, record: Record);
}

/// Collects records in memory.
impl MetricsSink for Vec<Record> {
    fn emit(&mut self, record: Record) {
        self.push(record);
    }
}

impl<T: MetricsSink + ?Sized> MetricsSink for &mut T {
    fn emit(&mut self, record: Record) {
        (**self).emit(record);
    }
}
