use async_trait::async_trait;
use cosmic_engine::traits::{RecognitionEvent, Recognizer, SpeechOutput, UrlOpener};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-based stand-in for a continuous speech recognizer.
///
/// Each line is one final transcript. A blank line ends the session the way a
/// recognizer times out on silence; end of input ends it for good.
pub struct LineRecognizer<R> {
    lines: Lines<R>,
    running: bool,
    exhausted: bool,
}

impl LineRecognizer<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            running: false,
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Recognizer for LineRecognizer<R> {
    fn start(&mut self) -> anyhow::Result<()> {
        if self.exhausted {
            anyhow::bail!("input closed");
        }
        if self.running {
            anyhow::bail!("recognition already started");
        }
        self.running = true;
        Ok(())
    }

    async fn next_event(&mut self) -> RecognitionEvent {
        let line = match self.lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.exhausted = true;
                self.running = false;
                return RecognitionEvent::Ended;
            }
            Err(e) => {
                log::error!("reading transcript input failed: {e}");
                self.exhausted = true;
                self.running = false;
                return RecognitionEvent::Ended;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            self.running = false;
            return RecognitionEvent::Ended;
        }
        match line.strip_prefix('!') {
            Some(code) => RecognitionEvent::Error(code.to_string()),
            None => RecognitionEvent::Transcript(line.to_string()),
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Prints what a speech synthesizer would say.
pub struct ConsoleSpeech {
    pub pitch: f32,
    pub rate: f32,
}

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        log::debug!("speak pitch={} rate={}: {text}", self.pitch, self.rate);
        println!("🔊 {text}");
        Ok(())
    }
}

pub struct ConsoleOpener;

impl UrlOpener for ConsoleOpener {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        println!("↗ {url}");
        Ok(())
    }
}
