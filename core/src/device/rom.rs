/// Read-only memory image addressed modulo its length, so a short image
/// repeats across whatever window it is mapped into.
#[derive(Clone, Debug)]
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    /// Returns `None` for an empty image.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        if data.is_empty() {
            None
        } else {
            Some(Self { data })
        }
    }

    pub fn read(&self, addr: usize) -> u8 {
        self.data[addr % self.data.len()]
    }
}
