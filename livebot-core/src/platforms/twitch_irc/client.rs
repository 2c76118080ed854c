//! src/platforms/twitch_irc/client.rs

use tokio::io::{split, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_native_tls::native_tls;
use tokio_native_tls::TlsConnector;
use tracing::{debug, error, info, warn};

use crate::services::invocation::RawChatMessage;
use crate::Error;

pub const TWITCH_IRC_HOST: &str = "irc.chat.twitch.tv";
pub const TWITCH_IRC_TLS_PORT: u16 = 6697;

/// One IRC line split into its parts. Tags are kept raw; see [`IrcLine::tag`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrcLine {
    pub tags: Option<String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl IrcLine {
    pub fn parse(line: &str) -> Self {
        let mut rest = line.trim();
        let mut out = IrcLine::default();

        // 1) tags
        if let Some(stripped) = rest.strip_prefix('@') {
            match stripped.split_once(' ') {
                Some((tags, tail)) => {
                    out.tags = Some(tags.to_string());
                    rest = tail.trim_start();
                }
                None => {
                    out.tags = Some(stripped.to_string());
                    return out;
                }
            }
        }

        // 2) prefix
        if let Some(stripped) = rest.strip_prefix(':') {
            match stripped.split_once(' ') {
                Some((prefix, tail)) => {
                    out.prefix = Some(prefix.to_string());
                    rest = tail.trim_start();
                }
                None => {
                    out.prefix = Some(stripped.to_string());
                    return out;
                }
            }
        }

        // 3) command
        let (command, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        out.command = command.to_uppercase();

        // 4) params, then trailing after " :" (or a leading ':')
        let (middle, trailing) = if let Some(t) = tail.strip_prefix(':') {
            ("", Some(t))
        } else if let Some((m, t)) = tail.split_once(" :") {
            (m, Some(t))
        } else {
            (tail, None)
        };
        out.params = middle.split_whitespace().map(str::to_string).collect();
        out.trailing = trailing.map(str::to_string);
        out
    }

    /// Value of a single tag, `None` when absent. Empty values come back as `Some("")`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_deref()?.split(';').find_map(|kv| {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            (k == key).then_some(v)
        })
    }

    /// `nick` out of `nick!user@host`.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split_once('!').map(|(n, _)| n).unwrap_or(prefix))
    }

    /// Builds a chat message from a tagged PRIVMSG. `None` for anything else
    /// or when required tags are missing.
    pub fn to_chat_message(&self) -> Option<RawChatMessage> {
        if self.command != "PRIVMSG" {
            return None;
        }
        let channel = self.params.first()?.trim_start_matches('#').to_string();
        let login = self.nick()?.to_lowercase();
        let display_name = match self.tag("display-name") {
            Some(dn) if !dn.is_empty() => dn.to_string(),
            _ => login.clone(),
        };

        Some(RawChatMessage {
            text: self.trailing.clone().unwrap_or_default(),
            user_id: self.tag("user-id")?.to_string(),
            user_login: login,
            display_name,
            is_mod: self.tag("mod") == Some("1"),
            channel_id: self.tag("room-id")?.to_string(),
            channel_name: channel,
        })
    }
}

/// Low-level IRC client that connects to Twitch via TLS.
pub struct TwitchIrcClient {
    raw_outgoing: mpsc::UnboundedSender<String>,
    /// Taken once by whoever consumes chat lines.
    pub incoming: Option<mpsc::UnboundedReceiver<IrcLine>>,
    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl TwitchIrcClient {
    /// Connects over TLS, authenticates with PASS/NICK, requests tags and
    /// commands capabilities and spawns the read/write loops.
    pub async fn connect(username: &str, oauth_token: &str) -> Result<Self, Error> {
        // 1) raw TCP connect
        let tcp = TcpStream::connect((TWITCH_IRC_HOST, TWITCH_IRC_TLS_PORT))
            .await
            .map_err(|e| Error::Platform(format!("TCP connect error: {e}")))?;

        // 2) TLS handshake
        let native_connector = native_tls::TlsConnector::new()
            .map_err(|e| Error::Platform(format!("TlsConnector::new() => {e}")))?;
        let connector = TlsConnector::from(native_connector);
        let tls_stream = connector
            .connect(TWITCH_IRC_HOST, tcp)
            .await
            .map_err(|e| Error::Platform(format!("TLS connect() => {e}")))?;

        let (read_half, write_half) = split(tls_stream);

        // 3) channels
        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<IrcLine>();

        // 4) writer, then login before anything else is queued
        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));
        let token = if oauth_token.starts_with("oauth:") {
            oauth_token.to_string()
        } else {
            format!("oauth:{}", oauth_token)
        };
        for line in [
            format!("PASS {}", token),
            format!("NICK {}", username.to_lowercase()),
            "CAP REQ :twitch.tv/commands twitch.tv/tags".to_string(),
        ] {
            tx_outgoing
                .send(line)
                .map_err(|_| Error::Platform("IRC writer stopped during login".into()))?;
        }

        // 5) reader
        let read_task = tokio::spawn(Self::reader_loop(read_half, tx_incoming, tx_outgoing.clone()));

        info!("Connected to {}:{} as {}", TWITCH_IRC_HOST, TWITCH_IRC_TLS_PORT, username);
        Ok(Self {
            raw_outgoing: tx_outgoing,
            incoming: Some(rx_incoming),
            read_task,
            write_task,
        })
    }

    async fn reader_loop<R>(
        read_half: R,
        tx_incoming: mpsc::UnboundedSender<IrcLine>,
        tx_outgoing: mpsc::UnboundedSender<String>,
    ) where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(read_half);
        let mut line_buffer = String::new();

        loop {
            line_buffer.clear();
            match reader.read_line(&mut line_buffer).await {
                Ok(0) => {
                    info!("(TwitchIrcClient) reader_loop => EOF");
                    break;
                }
                Ok(_) => {
                    let line = line_buffer.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("<< {}", line);

                    let parsed = IrcLine::parse(line);
                    match parsed.command.as_str() {
                        "PING" => {
                            let payload = parsed.trailing.as_deref().unwrap_or("tmi.twitch.tv");
                            let _ = tx_outgoing.send(format!("PONG :{}", payload));
                        }
                        "RECONNECT" => {
                            warn!("(TwitchIrcClient) server requested RECONNECT");
                            break;
                        }
                        "NOTICE" => {
                            let text = parsed.trailing.as_deref().unwrap_or_default();
                            if text.contains("Login authentication failed") {
                                error!("(TwitchIrcClient) login failed: {}", text);
                                break;
                            }
                            info!("(TwitchIrcClient) NOTICE: {}", text);
                        }
                        _ => {
                            if tx_incoming.send(parsed).is_err() {
                                debug!("(TwitchIrcClient) nobody is listening for incoming lines");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("(TwitchIrcClient) read error => {:?}", e);
                    break;
                }
            }
        }

        info!("(TwitchIrcClient) reader_loop ended.");
    }

    async fn writer_loop<W>(write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<String>)
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(write_half);

        while let Some(line) = rx_outgoing.recv().await {
            if line.starts_with("PASS ") {
                debug!(">> PASS ***");
            } else {
                debug!(">> {}", line);
            }
            if let Err(e) = write_line(&mut writer, &line).await {
                error!("(TwitchIrcClient) writer error => {:?}", e);
                break;
            }
        }

        info!("(TwitchIrcClient) writer_loop ended.");
    }

    pub fn send_raw_line(&self, line: &str) -> Result<(), Error> {
        self.raw_outgoing
            .send(line.to_string())
            .map_err(|_| Error::Platform("IRC connection is closed".into()))
    }

    pub fn join_channel(&self, channel: &str) -> Result<(), Error> {
        self.send_raw_line(&format!("JOIN #{}", normalize_channel(channel)))
    }

    pub fn part_channel(&self, channel: &str) -> Result<(), Error> {
        self.send_raw_line(&format!("PART #{}", normalize_channel(channel)))
    }

    /// Line breaks would end the IRC line early, so they become spaces.
    pub fn send_privmsg(&self, channel: &str, message: &str) -> Result<(), Error> {
        let text: String = message
            .chars()
            .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
            .collect();
        self.send_raw_line(&format!("PRIVMSG #{} :{}", normalize_channel(channel), text))
    }

    pub fn shutdown(&self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

async fn write_line<W>(writer: &mut BufWriter<W>, line: &str) -> std::io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await
}

fn normalize_channel(channel: &str) -> String {
    channel.trim_start_matches('#').to_lowercase()
}
